/// Reason strings are part of the external status surface: tooling matches
/// on them verbatim, so they are frozen here and nowhere else.
pub const REASON_RELATION_MISSING: &str = "Waiting for fiveg-n2 relation to be created";
pub const REASON_CONTAINER: &str = "Waiting for container to be ready";
pub const REASON_STORAGE: &str = "Waiting for storage to be attached";
pub const REASON_ATTACHMENT: &str = "Waiting for network attachment to be ready";
pub const REASON_AMF_DATA: &str = "Waiting for AMF endpoint data";

/// External signal that caused a reconciliation attempt.
///
/// Every trigger runs the same idempotent pass; the variant only matters
/// for logging and for the dispatch layer's redelivery bookkeeping.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    ConfigChanged,
    WorkloadReady,
    StorageAttached,
    NetworkAttachmentChanged,
    N2DataChanged,
    /// Redelivery of an earlier deferred attempt.
    Redelivery,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::ConfigChanged => "config-changed",
            Trigger::WorkloadReady => "workload-ready",
            Trigger::StorageAttached => "storage-attached",
            Trigger::NetworkAttachmentChanged => "network-attachment-changed",
            Trigger::N2DataChanged => "n2-data-changed",
            Trigger::Redelivery => "redelivery",
        }
    }
}

/// Status exposed to the external observer. Overwritten whole on every
/// reconciliation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitStatus {
    /// Operator intervention or a topology change is required.
    Blocked(String),
    /// A transient precondition is unmet; an external signal will resolve it.
    Waiting(String),
    Active,
}

impl UnitStatus {
    pub fn state(&self) -> &'static str {
        match self {
            UnitStatus::Blocked(_) => "blocked",
            UnitStatus::Waiting(_) => "waiting",
            UnitStatus::Active => "active",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            UnitStatus::Blocked(r) | UnitStatus::Waiting(r) => Some(r),
            UnitStatus::Active => None,
        }
    }
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitStatus::Blocked(r) => write!(f, "blocked: {r}"),
            UnitStatus::Waiting(r) => write!(f, "waiting: {r}"),
            UnitStatus::Active => write!(f, "active"),
        }
    }
}

/// Terminal decision of one reconciliation pass.
///
/// `RetryLater` and `Waiting` both surface as a Waiting status; they differ
/// in who brings the next attempt about. `RetryLater` asks the dispatch
/// layer to redeliver the same trigger; `Waiting` relies on a fresh external
/// event (e.g. relation data arriving).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// All checks passed and all side effects completed.
    Active {
        /// Hex SHA-256 of the written artifact.
        config_digest: String,
    },
    Blocked {
        reason: String,
    },
    RetryLater {
        reason: String,
    },
    Waiting {
        reason: String,
    },
}

impl ReconcileOutcome {
    /// Reduce the outcome to the externally visible status.
    pub fn unit_status(&self) -> UnitStatus {
        match self {
            ReconcileOutcome::Active { .. } => UnitStatus::Active,
            ReconcileOutcome::Blocked { reason } => UnitStatus::Blocked(reason.clone()),
            ReconcileOutcome::RetryLater { reason } | ReconcileOutcome::Waiting { reason } => {
                UnitStatus::Waiting(reason.clone())
            }
        }
    }

    /// The dispatch layer should redeliver the trigger later.
    pub fn wants_redelivery(&self) -> bool {
        matches!(self, ReconcileOutcome::RetryLater { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_later_surfaces_as_waiting() {
        let outcome = ReconcileOutcome::RetryLater {
            reason: REASON_CONTAINER.to_string(),
        };
        assert_eq!(
            outcome.unit_status(),
            UnitStatus::Waiting(REASON_CONTAINER.to_string())
        );
        assert!(outcome.wants_redelivery());
    }

    #[test]
    fn waiting_does_not_ask_for_redelivery() {
        let outcome = ReconcileOutcome::Waiting {
            reason: REASON_AMF_DATA.to_string(),
        };
        assert!(!outcome.wants_redelivery());
    }

    #[test]
    fn active_has_no_reason() {
        let outcome = ReconcileOutcome::Active {
            config_digest: "00".repeat(32),
        };
        let status = outcome.unit_status();
        assert_eq!(status.state(), "active");
        assert_eq!(status.reason(), None);
    }
}
