//! gso-simrun
//!
//! The on-demand simulation action: run the simulation binary against the
//! already-written artifact and classify the verdict from its diagnostic
//! output.
//!
//! The action is independent of the reconciler — it only requires that the
//! artifact exists. Failures are reported through the action's own error
//! channel and never touch the unit status.

use gso_workload::{config_file_path, config_is_written, Workload, WorkloadError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

/// Path of the simulation binary inside the workload.
pub const GNBSIM_BINARY: &str = "/gnbsim/bin/gnbsim";

/// Marker the simulator prints on its diagnostic stream when every profile
/// passed.
pub const PASS_MARKER: &str = "Profile Status: PASS";

/// Execution bound when the POD_IP/MEM_LIMIT context is supplied.
pub const EXEC_TIMEOUT_WITH_CONTEXT: Duration = Duration::from_secs(30);

/// Execution bound without the environment context.
pub const EXEC_TIMEOUT_PLAIN: Duration = Duration::from_secs(300);

/// Fixed pointer handed back with every verdict.
pub const ACTION_INFO: &str = "inspect the operator log for the full simulation transcript";

// ---------------------------------------------------------------------------
// Environment context
// ---------------------------------------------------------------------------

/// Environment handed to the simulation binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimEnv {
    pub pod_ip: String,
    pub mem_limit: String,
}

impl SimEnv {
    pub fn new(pod_ip: impl Into<String>) -> Self {
        Self {
            pod_ip: pod_ip.into(),
            mem_limit: "1Gi".to_string(),
        }
    }

    fn to_env(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("MEM_LIMIT".to_string(), self.mem_limit.clone()),
            ("POD_IP".to_string(), self.pod_ip.clone()),
        ])
    }
}

// ---------------------------------------------------------------------------
// Outcome and errors
// ---------------------------------------------------------------------------

/// Verdict of one simulation run. Derived per invocation; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationOutcome {
    /// The diagnostic stream contained [`PASS_MARKER`].
    pub passed: bool,
    /// Primary output stream, captured for completeness.
    pub raw_output: String,
    /// Full diagnostic stream, retained for operator inspection.
    pub detail: String,
}

/// Why the action itself failed. Distinct from a `passed = false` verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionError {
    ContainerNotReady,
    ConfigFileNotWritten,
    /// The binary ran but produced no diagnostic output at all.
    NoOutput,
    /// The command failed to execute (including timeout expiry).
    Exec { detail: String },
    /// The workload manager refused or aborted the change.
    Change { detail: String },
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::ContainerNotReady => write!(f, "Container is not ready"),
            ActionError::ConfigFileNotWritten => write!(f, "Config file is not written"),
            ActionError::NoOutput => write!(f, "No output in simulation"),
            ActionError::Exec { detail } | ActionError::Change { detail } => {
                write!(f, "Failed to execute simulation: {detail}")
            }
        }
    }
}

impl std::error::Error for ActionError {}

impl From<WorkloadError> for ActionError {
    fn from(err: WorkloadError) -> Self {
        match err {
            WorkloadError::Change { message } => ActionError::Change { detail: message },
            other => ActionError::Exec {
                detail: other.detail().to_string(),
            },
        }
    }
}

/// The record handed back to the action caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    /// `"true"` or `"false"` — string-typed for the action surface.
    pub success: String,
    pub info: String,
}

impl From<&SimulationOutcome> for ActionResult {
    fn from(outcome: &SimulationOutcome) -> Self {
        Self {
            success: if outcome.passed { "true" } else { "false" }.to_string(),
            info: ACTION_INFO.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Runs the simulation binary against the written artifact.
pub struct SimulationRunner<'a, W: Workload + ?Sized> {
    workload: &'a W,
    env: Option<SimEnv>,
}

impl<'a, W: Workload + ?Sized> SimulationRunner<'a, W> {
    pub fn new(workload: &'a W) -> Self {
        Self {
            workload,
            env: None,
        }
    }

    /// Supply the POD_IP/MEM_LIMIT context; also tightens the timeout.
    pub fn with_env(workload: &'a W, env: SimEnv) -> Self {
        Self {
            workload,
            env: Some(env),
        }
    }

    /// Execute one run.
    ///
    /// Preconditions are checked explicitly so the caller gets the precise
    /// failure reason rather than a generic error. The action always
    /// resolves: a verdict, or a stated failure.
    pub fn run(&self) -> Result<SimulationOutcome, ActionError> {
        if !self.workload.can_connect() {
            return Err(ActionError::ContainerNotReady);
        }
        if !config_is_written(self.workload) {
            return Err(ActionError::ConfigFileNotWritten);
        }

        let command = vec![
            GNBSIM_BINARY.to_string(),
            "--cfg".to_string(),
            config_file_path(),
        ];
        let timeout = if self.env.is_some() {
            EXEC_TIMEOUT_WITH_CONTEXT
        } else {
            EXEC_TIMEOUT_PLAIN
        };
        let env = self.env.as_ref().map(SimEnv::to_env);

        let output = self.workload.exec(&command, timeout, env.as_ref())?;

        if output.stderr.is_empty() {
            return Err(ActionError::NoOutput);
        }
        info!("simulation output:\n=====\n{}\n=====", output.stderr);

        Ok(SimulationOutcome {
            passed: output.stderr.contains(PASS_MARKER),
            raw_output: output.stdout,
            detail: output.stderr,
        })
    }
}
