//! Axum router and all HTTP handlers.
//!
//! `build_router` is the single entry point; `main.rs` attaches middleware
//! after this call so the scenario tests can drive the bare router
//! in-process.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::{
    api_types::{
        service_ports, ActionFailureResponse, ActionResponse, AttachmentUpdate,
        BadRequestResponse, HealthResponse, ReconcileRequest, RelationUpdate, StatusSnapshot,
    },
    state::AppState,
};
use gso_config::{AmfEndpoint, N2RelationView, StaticConfig};
use gso_host::FixedAttachment;
use gso_reconcile::{ReconcileOutcome, Reconciler, Trigger};
use gso_simrun::{ActionResult, SimEnv, SimulationRunner};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/status", get(status_handler))
        .route("/v1/config", post(update_config))
        .route("/v1/reconcile", post(reconcile_handler))
        .route("/v1/relation/n2", post(update_relation))
        .route("/v1/network-attachment", post(update_attachment))
        .route("/v1/actions/start-simulation", post(start_simulation))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// The one reconciliation path every mutation funnels into
// ---------------------------------------------------------------------------

/// Run one reconciliation pass and record the resulting status snapshot.
///
/// Passes are serialized behind `reconcile_gate`; the workload interaction
/// itself runs on a blocking task because the host drives its own runtime.
pub async fn run_reconcile(state: &Arc<AppState>, trigger: Trigger) -> StatusSnapshot {
    let _gate = state.reconcile_gate.lock().await;

    let cfg = state.config.read().await.clone();
    let relation = state.relation.read().await.clone();
    let attachment_ready = *state.attachment_ready.read().await;

    let st = Arc::clone(state);
    let outcome = tokio::task::spawn_blocking(move || {
        let attachment = FixedAttachment::new(attachment_ready);
        let reconciler = Reconciler::new(&st.workload, &attachment, st.control.clone(), st.mode);
        reconciler.reconcile(&cfg, &relation, trigger)
    })
    .await
    .unwrap_or_else(|e| ReconcileOutcome::Blocked {
        reason: format!("reconciliation aborted: {e}"),
    });

    let unit = outcome.unit_status();
    let snap = StatusSnapshot {
        state: unit.state().to_string(),
        reason: unit.reason().map(str::to_string),
        redeliver: outcome.wants_redelivery(),
        config_digest: match &outcome {
            ReconcileOutcome::Active { config_digest } => Some(config_digest.clone()),
            _ => None,
        },
        last_trigger: Some(trigger.as_str().to_string()),
        last_reconciled_at_utc: Some(Utc::now()),
        ports: service_ports(),
    };
    *state.status.write().await = snap.clone();
    info!(
        trigger = trigger.as_str(),
        state = %snap.state,
        "reconcile pass recorded"
    );
    snap
}

fn parse_trigger(name: &str) -> Option<Trigger> {
    match name {
        "config-changed" => Some(Trigger::ConfigChanged),
        "workload-ready" => Some(Trigger::WorkloadReady),
        "storage-attached" => Some(Trigger::StorageAttached),
        "network-attachment-changed" => Some(Trigger::NetworkAttachmentChanged),
        "n2-data-changed" => Some(Trigger::N2DataChanged),
        "redelivery" => Some(Trigger::Redelivery),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/status
// ---------------------------------------------------------------------------

pub(crate) async fn status_handler(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let snap = st.status.read().await.clone();
    (StatusCode::OK, Json(snap))
}

// ---------------------------------------------------------------------------
// POST /v1/config
// ---------------------------------------------------------------------------

pub(crate) async fn update_config(
    State(st): State<Arc<AppState>>,
    Json(config): Json<StaticConfig>,
) -> impl IntoResponse {
    *st.config.write().await = config;
    let snap = run_reconcile(&st, Trigger::ConfigChanged).await;
    (StatusCode::OK, Json(snap))
}

// ---------------------------------------------------------------------------
// POST /v1/reconcile
// ---------------------------------------------------------------------------

pub(crate) async fn reconcile_handler(
    State(st): State<Arc<AppState>>,
    body: Option<Json<ReconcileRequest>>,
) -> Response {
    let requested = body.and_then(|Json(r)| r.trigger);
    let trigger = match requested.as_deref() {
        None => Trigger::Redelivery,
        Some(name) => match parse_trigger(name) {
            Some(t) => t,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(BadRequestResponse {
                        error: format!("unknown trigger: {name}"),
                    }),
                )
                    .into_response()
            }
        },
    };
    let snap = run_reconcile(&st, trigger).await;
    (StatusCode::OK, Json(snap)).into_response()
}

// ---------------------------------------------------------------------------
// POST /v1/relation/n2
// ---------------------------------------------------------------------------

pub(crate) async fn update_relation(
    State(st): State<Arc<AppState>>,
    Json(update): Json<RelationUpdate>,
) -> impl IntoResponse {
    let view = N2RelationView {
        created: update.created,
        endpoint: AmfEndpoint::from_raw(
            update.amf_hostname.as_deref(),
            update.amf_port.as_deref(),
        ),
    };
    *st.relation.write().await = view;
    let snap = run_reconcile(&st, Trigger::N2DataChanged).await;
    (StatusCode::OK, Json(snap))
}

// ---------------------------------------------------------------------------
// POST /v1/network-attachment
// ---------------------------------------------------------------------------

pub(crate) async fn update_attachment(
    State(st): State<Arc<AppState>>,
    Json(update): Json<AttachmentUpdate>,
) -> impl IntoResponse {
    *st.attachment_ready.write().await = update.ready;
    let snap = run_reconcile(&st, Trigger::NetworkAttachmentChanged).await;
    (StatusCode::OK, Json(snap))
}

// ---------------------------------------------------------------------------
// POST /v1/actions/start-simulation
// ---------------------------------------------------------------------------

/// Run the simulation action. Failures are the action's own — they never
/// touch the unit status.
pub(crate) async fn start_simulation(State(st): State<Arc<AppState>>) -> Response {
    let action_id = Uuid::new_v4();
    let pod_ip = st.control.ip.clone();

    let stc = Arc::clone(&st);
    let result = tokio::task::spawn_blocking(move || {
        SimulationRunner::with_env(&stc.workload, SimEnv::new(pod_ip)).run()
    })
    .await;

    match result {
        Ok(Ok(outcome)) => {
            let verdict = ActionResult::from(&outcome);
            info!(%action_id, success = %verdict.success, "simulation finished");
            (
                StatusCode::OK,
                Json(ActionResponse {
                    action_id,
                    success: verdict.success,
                    info: verdict.info,
                }),
            )
                .into_response()
        }
        Ok(Err(err)) => (
            StatusCode::CONFLICT,
            Json(ActionFailureResponse {
                action_id,
                error: err.to_string(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ActionFailureResponse {
                action_id,
                error: format!("simulation task aborted: {e}"),
            }),
        )
            .into_response(),
    }
}
