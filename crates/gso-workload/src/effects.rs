use crate::{Workload, WorkloadError};
use std::time::Duration;
use tracing::info;

/// Directory backing the config volume inside the workload.
pub const BASE_CONFIG_PATH: &str = "/etc/gnbsim";

/// Name of the rendered configuration artifact.
pub const CONFIG_FILE_NAME: &str = "gnb.conf";

/// Timeout for short housekeeping commands (route replacement).
pub const ROUTE_EXEC_TIMEOUT: Duration = Duration::from_secs(30);

/// Full destination path of the configuration artifact.
pub fn config_file_path() -> String {
    format!("{BASE_CONFIG_PATH}/{CONFIG_FILE_NAME}")
}

/// Write the rendered artifact to its fixed path.
///
/// Idempotent: the push replaces the whole file; identical content leaves
/// the destination unchanged.
pub fn write_config<W: Workload + ?Sized>(workload: &W, content: &str) -> Result<(), WorkloadError> {
    workload.push(&config_file_path(), content)?;
    info!(path = %config_file_path(), "config file written");
    Ok(())
}

/// The artifact already exists at its fixed path.
///
/// Used by the simulation action as a precondition, independently of the
/// reconciler's own pass.
pub fn config_is_written<W: Workload + ?Sized>(workload: &W) -> bool {
    workload.exists(&config_file_path())
}

/// Point outbound UPF traffic at the configured gateway.
///
/// Replace semantics: repeated calls with the same pair do not error on an
/// existing route.
pub fn replace_upf_route<W: Workload + ?Sized>(
    workload: &W,
    destination: &str,
    gateway: &str,
) -> Result<(), WorkloadError> {
    let command: Vec<String> = ["ip", "route", "replace", destination, "via", gateway]
        .iter()
        .map(|s| s.to_string())
        .collect();
    workload.exec(&command, ROUTE_EXEC_TIMEOUT, None)?;
    info!(destination, gateway, "UPF route replaced");
    Ok(())
}
