//! gso-workload
//!
//! The collaborator boundary of the operator: the `Workload` executor trait,
//! the network-attachment readiness probe, and the two idempotent side
//! effects performed inside the workload (config write, UPF route replace).
//!
//! Real hosts implement [`Workload`] in their own crate; tests use the
//! recorder double from gso-testkit. Everything here is written against the
//! trait, never against a concrete host.

mod attachment;
mod effects;
mod workload;

pub use attachment::{
    gnb_network_annotation, NetworkAnnotation, NetworkAttachment, NETWORK_ATTACHMENT_INTERFACE,
    NETWORK_ATTACHMENT_NAME,
};
pub use effects::{
    config_file_path, config_is_written, replace_upf_route, write_config, BASE_CONFIG_PATH,
    CONFIG_FILE_NAME, ROUTE_EXEC_TIMEOUT,
};
pub use workload::{ExecOutput, Workload, WorkloadError};
