use crate::{
    ReconcileOutcome, Trigger, REASON_AMF_DATA, REASON_ATTACHMENT, REASON_CONTAINER,
    REASON_RELATION_MISSING, REASON_STORAGE,
};
use gso_config::{resolve, GnbParams, N2RelationView, SourceMode, StaticConfig};
use gso_render::{content_digest, render, ControlEndpoint};
use gso_workload::{
    replace_upf_route, write_config, NetworkAttachment, Workload, BASE_CONFIG_PATH,
};
use tracing::{debug, error, info};

/// Failure of a post-gate step. Kept internal: the reconciler reduces it to
/// a Blocked reason naming the step, so the loop survives collaborator
/// faults instead of crashing.
enum EffectError {
    Render(anyhow::Error),
    Write(gso_workload::WorkloadError),
    Route(gso_workload::WorkloadError),
}

impl EffectError {
    fn blocked_reason(&self) -> String {
        match self {
            EffectError::Render(e) => format!("Failed to render config file: {e}"),
            EffectError::Write(e) => format!("Failed to write config file: {e}"),
            EffectError::Route(e) => format!("Failed to create UPF route: {e}"),
        }
    }

    fn step(&self) -> &'static str {
        match self {
            EffectError::Render(_) => "render",
            EffectError::Write(_) => "write",
            EffectError::Route(_) => "route",
        }
    }
}

/// Runs the ordered readiness gate and, on a full pass, the three side
/// effects (render, write, route). Holds no state of its own: every
/// invocation recomputes from current inputs.
pub struct Reconciler<'a, W: Workload + ?Sized, A: NetworkAttachment + ?Sized> {
    workload: &'a W,
    attachment: &'a A,
    control: ControlEndpoint,
    mode: SourceMode,
}

impl<'a, W: Workload + ?Sized, A: NetworkAttachment + ?Sized> Reconciler<'a, W, A> {
    pub fn new(
        workload: &'a W,
        attachment: &'a A,
        control: ControlEndpoint,
        mode: SourceMode,
    ) -> Self {
        Self {
            workload,
            attachment,
            control,
            mode,
        }
    }

    /// One reconciliation pass.
    ///
    /// Checks run strictly in order; the first failure is terminal for this
    /// attempt and nothing after it is probed. Only a full pass reaches the
    /// side effects, which always run all three steps — no diff check
    /// against a previous artifact.
    pub fn reconcile(
        &self,
        cfg: &StaticConfig,
        relation: &N2RelationView,
        trigger: Trigger,
    ) -> ReconcileOutcome {
        debug!(trigger = trigger.as_str(), "reconcile started");

        // 1. All parameters present and valid.
        let resolved = match resolve(cfg, self.mode) {
            Ok(r) => r,
            Err(invalid) => {
                return ReconcileOutcome::Blocked {
                    reason: invalid.to_string(),
                }
            }
        };

        // 2. Relation exists (relation-sourced mode only).
        if self.mode == SourceMode::N2Relation && !relation.created {
            return ReconcileOutcome::Blocked {
                reason: REASON_RELATION_MISSING.to_string(),
            };
        }

        // 3. Workload accepts commands.
        if !self.workload.can_connect() {
            return ReconcileOutcome::RetryLater {
                reason: REASON_CONTAINER.to_string(),
            };
        }

        // 4. Backing storage is attached.
        if !self.workload.exists(BASE_CONFIG_PATH) {
            return ReconcileOutcome::RetryLater {
                reason: REASON_STORAGE.to_string(),
            };
        }

        // 5. Secondary network attachment is usable. Only the
        //    relation-sourced mode defers; in static mode the attachment
        //    provisioner re-triggers reconciliation itself.
        if !self.attachment.is_ready() {
            let reason = REASON_ATTACHMENT.to_string();
            return match self.mode {
                SourceMode::Static => ReconcileOutcome::Waiting { reason },
                SourceMode::N2Relation => ReconcileOutcome::RetryLater { reason },
            };
        }

        // 6. AMF endpoint published (relation-sourced mode only). No defer:
        //    the data channel re-triggers when the peer publishes.
        let params = match resolved.into_params(relation) {
            Some(p) => p,
            None => {
                return ReconcileOutcome::Waiting {
                    reason: REASON_AMF_DATA.to_string(),
                }
            }
        };

        match self.apply(&params) {
            Ok(config_digest) => {
                info!(digest = %config_digest, "reconciled to active");
                ReconcileOutcome::Active { config_digest }
            }
            Err(e) => {
                let reason = e.blocked_reason();
                error!(step = e.step(), reason = %reason, "post-gate step failed");
                ReconcileOutcome::Blocked { reason }
            }
        }
    }

    /// Render, write, provision — in that order. Returns the artifact
    /// digest on success.
    fn apply(&self, params: &GnbParams) -> Result<String, EffectError> {
        let content = render(params, &self.control).map_err(EffectError::Render)?;
        let digest = content_digest(&content);
        write_config(self.workload, &content).map_err(EffectError::Write)?;
        replace_upf_route(self.workload, &params.upf_ip_address, &params.upf_gateway)
            .map_err(EffectError::Route)?;
        Ok(digest)
    }
}
