use std::collections::BTreeMap;
use std::time::Duration;

/// Captured output streams of a workload command.
///
/// Both streams are captured separately; callers decide which one carries
/// the signal (the simulation binary reports on stderr).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Failure at the workload boundary.
///
/// Two execution-failure kinds are kept distinct because the hosting
/// environment reports them differently: a command that ran and failed
/// (`Exec`, possibly with captured stderr) versus the workload manager
/// refusing or aborting the change (`Change`). Timeout expiry of a running
/// command is an `Exec` failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkloadError {
    Exec {
        message: String,
        stderr: Option<String>,
    },
    Change {
        message: String,
    },
    Io {
        message: String,
    },
}

impl WorkloadError {
    pub fn exec(message: impl Into<String>) -> Self {
        WorkloadError::Exec {
            message: message.into(),
            stderr: None,
        }
    }

    pub fn exec_with_stderr(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        WorkloadError::Exec {
            message: message.into(),
            stderr: Some(stderr.into()),
        }
    }

    pub fn change(message: impl Into<String>) -> Self {
        WorkloadError::Change {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        WorkloadError::Io {
            message: message.into(),
        }
    }

    /// The diagnostic text most useful to a human: captured stderr when the
    /// command produced any, the error message otherwise.
    pub fn detail(&self) -> &str {
        match self {
            WorkloadError::Exec {
                stderr: Some(s), ..
            } if !s.is_empty() => s,
            WorkloadError::Exec { message, .. } => message,
            WorkloadError::Change { message } => message,
            WorkloadError::Io { message } => message,
        }
    }
}

impl std::fmt::Display for WorkloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkloadError::Exec { message, .. } => write!(f, "command execution failed: {message}"),
            WorkloadError::Change { message } => write!(f, "workload change failed: {message}"),
            WorkloadError::Io { message } => write!(f, "workload io failed: {message}"),
        }
    }
}

impl std::error::Error for WorkloadError {}

/// Command executor and file surface of the managed workload.
///
/// # Contract
/// - `push` has atomic replace semantics: a concurrent reader observes
///   either the previous content or the new content, never a partial write.
///   Pushing identical content twice is a no-op in effect.
/// - `exec` runs the argv to completion or to `timeout`, whichever comes
///   first; expiry aborts the command and is reported as
///   [`WorkloadError::Exec`].
/// - All methods take `&self`; the run-to-completion model means there is
///   never more than one reconciliation driving a workload at a time.
pub trait Workload {
    /// The workload accepts commands and file operations right now.
    fn can_connect(&self) -> bool;

    /// The given path exists inside the workload.
    fn exists(&self, path: &str) -> bool;

    /// Write `content` to `path`, replacing any previous content atomically.
    fn push(&self, path: &str, content: &str) -> Result<(), WorkloadError>;

    /// Execute `command` (argv form) with a bounded timeout and optional
    /// extra environment, capturing both output streams.
    fn exec(
        &self,
        command: &[String],
        timeout: Duration,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<ExecOutput, WorkloadError>;
}
