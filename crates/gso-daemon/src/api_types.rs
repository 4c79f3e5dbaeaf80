//! Wire types of the daemon API.

use chrono::{DateTime, Utc};
use gso_render::HTTP_SERVER_PORT;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub version: &'static str,
}

/// One exposed service port of the managed workload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServicePortInfo {
    pub name: String,
    pub port: u16,
    pub protocol: String,
}

/// The ports this workload exposes: NGAP signalling and the simulator's
/// own HTTP API.
pub fn service_ports() -> Vec<ServicePortInfo> {
    vec![
        ServicePortInfo {
            name: "ngapp".to_string(),
            port: 38412,
            protocol: "SCTP".to_string(),
        },
        ServicePortInfo {
            name: "http-api".to_string(),
            port: HTTP_SERVER_PORT,
            protocol: "TCP".to_string(),
        },
    ]
}

/// The externally observable unit status, replaced whole on every
/// reconciliation pass.
#[derive(Clone, Debug, Serialize)]
pub struct StatusSnapshot {
    /// `unknown` before the first pass, then `blocked` / `waiting` /
    /// `active`.
    pub state: String,
    pub reason: Option<String>,
    /// The last pass asked for redelivery of its trigger.
    pub redeliver: bool,
    /// Hex SHA-256 of the written artifact; present only while active.
    pub config_digest: Option<String>,
    pub last_trigger: Option<String>,
    pub last_reconciled_at_utc: Option<DateTime<Utc>>,
    pub ports: Vec<ServicePortInfo>,
}

impl StatusSnapshot {
    /// State before the first reconciliation pass.
    pub fn boot() -> Self {
        Self {
            state: "unknown".to_string(),
            reason: None,
            redeliver: false,
            config_digest: None,
            last_trigger: None,
            last_reconciled_at_utc: None,
            ports: service_ports(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReconcileRequest {
    /// Trigger name; defaults to `redelivery`.
    pub trigger: Option<String>,
}

/// Relation data as delivered by the transport: raw strings.
#[derive(Debug, Deserialize)]
pub struct RelationUpdate {
    pub created: bool,
    #[serde(rename = "amf-hostname")]
    pub amf_hostname: Option<String>,
    #[serde(rename = "amf-port")]
    pub amf_port: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentUpdate {
    pub ready: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ActionResponse {
    pub action_id: Uuid,
    /// `"true"` or `"false"` — the simulation verdict.
    pub success: String,
    pub info: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ActionFailureResponse {
    pub action_id: Uuid,
    pub error: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct BadRequestResponse {
    pub error: String,
}
