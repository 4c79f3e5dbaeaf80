use serde::{Deserialize, Serialize};

/// Name of the secondary network attachment definition.
pub const NETWORK_ATTACHMENT_NAME: &str = "gnb-net";

/// Interface name the attachment binds inside the workload.
pub const NETWORK_ATTACHMENT_INTERFACE: &str = "gnb";

/// Readiness probe for the secondary network attachment.
///
/// The provisioning subsystem itself is outside this core; the reconciler
/// only asks whether the attachment is usable yet.
pub trait NetworkAttachment {
    fn is_ready(&self) -> bool;
}

/// Annotation handed to the (external) attachment provisioning subsystem:
/// which attachment, on which interface, with which addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAnnotation {
    pub name: String,
    pub interface: String,
    /// Addresses in CIDR form.
    pub ips: Vec<String>,
}

/// Annotation for the gNodeB attachment, derived from the configured
/// address. The full CIDR is passed through; only the renderer strips the
/// prefix length.
pub fn gnb_network_annotation(gnb_ip_cidr: &str) -> NetworkAnnotation {
    NetworkAnnotation {
        name: NETWORK_ATTACHMENT_NAME.to_string(),
        interface: NETWORK_ATTACHMENT_INTERFACE.to_string(),
        ips: vec![gnb_ip_cidr.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_carries_full_cidr() {
        let ann = gnb_network_annotation("192.168.251.5/24");
        assert_eq!(ann.name, "gnb-net");
        assert_eq!(ann.interface, "gnb");
        assert_eq!(ann.ips, vec!["192.168.251.5/24".to_string()]);
    }
}
