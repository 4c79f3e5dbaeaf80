//! gso-host
//!
//! `LocalProcessWorkload`: the real [`Workload`] implementation. The
//! workload's file surface is rooted at a host directory (the simulated
//! container filesystem); commands execute as local processes with a
//! bounded timeout.

use anyhow::{Context, Result};
use gso_workload::{ExecOutput, NetworkAttachment, Workload, WorkloadError};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Workload backed by a host directory and local process execution.
///
/// Workload paths are absolute (`/etc/gnbsim/gnb.conf`) and are mapped
/// under `root`; commands run on the host itself — the root directory only
/// backs the file surface.
///
/// Process execution drives a private current-thread tokio runtime, so
/// `exec` must not be called from inside another runtime; async callers
/// wrap workload interaction in `spawn_blocking`.
pub struct LocalProcessWorkload {
    root: PathBuf,
    runtime: tokio::runtime::Runtime,
}

impl LocalProcessWorkload {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("build workload runtime failed")?;
        Ok(Self {
            root: root.into(),
            runtime,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn map_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Workload for LocalProcessWorkload {
    fn can_connect(&self) -> bool {
        self.root.is_dir()
    }

    fn exists(&self, path: &str) -> bool {
        self.map_path(path).exists()
    }

    /// Atomic replace: the content lands in a temporary file next to the
    /// destination and is renamed over it, so a concurrent reader never
    /// observes a partial write.
    fn push(&self, path: &str, content: &str) -> Result<(), WorkloadError> {
        let dest = self.map_path(path);
        let parent = dest
            .parent()
            .ok_or_else(|| WorkloadError::io(format!("no parent directory for {path}")))?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| WorkloadError::io(format!("create temp file in {}: {e}", parent.display())))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| WorkloadError::io(format!("write temp file: {e}")))?;
        tmp.persist(&dest)
            .map_err(|e| WorkloadError::io(format!("replace {}: {e}", dest.display())))?;
        debug!(path, bytes = content.len(), "pushed file");
        Ok(())
    }

    fn exec(
        &self,
        command: &[String],
        timeout: Duration,
        env: Option<&BTreeMap<String, String>>,
    ) -> Result<ExecOutput, WorkloadError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| WorkloadError::exec("empty command"))?;

        // Absolute programs come from the workload image and are mapped
        // under the root; bare names resolve via PATH on the host.
        let program = if program.starts_with('/') {
            self.map_path(program)
        } else {
            PathBuf::from(program)
        };

        let mut cmd = tokio::process::Command::new(&program);
        cmd.args(args)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        if let Some(env) = env {
            cmd.envs(env);
        }

        debug!(command = %command.join(" "), timeout_secs = timeout.as_secs(), "exec");
        self.runtime.block_on(async move {
            let output = match tokio::time::timeout(timeout, cmd.output()).await {
                Err(_) => {
                    return Err(WorkloadError::exec(format!(
                        "command timed out after {}s",
                        timeout.as_secs()
                    )))
                }
                // The process could not be started at all; the hosting layer
                // reports that as a change failure, not command output.
                Ok(Err(e)) => {
                    return Err(WorkloadError::change(format!("cannot start command: {e}")))
                }
                Ok(Ok(output)) => output,
            };

            let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            if output.status.success() {
                Ok(ExecOutput { stdout, stderr })
            } else {
                Err(WorkloadError::exec_with_stderr(
                    format!("command exited with {}", output.status),
                    stderr,
                ))
            }
        })
    }
}

/// Attachment probe whose answer is supplied by the hosting environment
/// (CLI flag, daemon state). The provisioning subsystem itself lives
/// outside this operator.
pub struct FixedAttachment(bool);

impl FixedAttachment {
    pub fn new(ready: bool) -> Self {
        Self(ready)
    }
}

impl NetworkAttachment for FixedAttachment {
    fn is_ready(&self) -> bool {
        self.0
    }
}
