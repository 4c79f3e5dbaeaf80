//! Shared daemon state.

use crate::api_types::StatusSnapshot;
use gso_config::{N2RelationView, SourceMode, StaticConfig};
use gso_host::LocalProcessWorkload;
use gso_render::ControlEndpoint;
use tokio::sync::{Mutex, RwLock};

pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

pub struct AppState {
    pub build: BuildInfo,
    pub mode: SourceMode,
    pub control: ControlEndpoint,
    pub workload: LocalProcessWorkload,

    /// Static config store; replaced whole by the config route.
    pub config: RwLock<StaticConfig>,
    /// Last observed fiveg-n2 relation view.
    pub relation: RwLock<N2RelationView>,
    /// Last reported attachment readiness.
    pub attachment_ready: RwLock<bool>,

    /// The unit status, replaced whole on every pass.
    pub status: RwLock<StatusSnapshot>,
    /// Serializes reconciliation passes: run-to-completion, one at a time.
    pub reconcile_gate: Mutex<()>,
}

impl AppState {
    pub fn new(
        config: StaticConfig,
        workload: LocalProcessWorkload,
        control: ControlEndpoint,
        mode: SourceMode,
    ) -> Self {
        Self {
            build: BuildInfo {
                service: "gso-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            mode,
            control,
            workload,
            config: RwLock::new(config),
            relation: RwLock::new(N2RelationView::absent()),
            attachment_ready: RwLock::new(false),
            status: RwLock::new(StatusSnapshot::boot()),
            reconcile_gate: Mutex::new(()),
        }
    }
}
