//! gso-render
//!
//! Renders the gnbsim configuration artifact from a validated parameter set.
//!
//! The renderer is deterministic: identical inputs produce byte-identical
//! output. Callers must have validated the parameter set first; this crate
//! does not re-validate.

use anyhow::{Context, Result};
use gso_config::GnbParams;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Port of the simulator's own HTTP control endpoint inside the workload.
pub const HTTP_SERVER_PORT: u16 = 6000;

/// Where this component's control endpoint can be reached.
///
/// Not part of the parameter set — supplied by the orchestration layer at
/// render time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlEndpoint {
    pub ip: String,
    pub port: u16,
}

impl ControlEndpoint {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            port: HTTP_SERVER_PORT,
        }
    }
}

// ---------------------------------------------------------------------------
// Document shape
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigDocument<'a> {
    info: Info,
    configuration: Configuration<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Info {
    description: &'static str,
    version: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Configuration<'a> {
    gnb: Gnb<'a>,
    plmn: Plmn<'a>,
    slice: Slice<'a>,
    profile: Profile<'a>,
    upf: Upf<'a>,
    http_server: HttpServer<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Gnb<'a> {
    n2_ip_addr: &'a str,
    amf_host_name: &'a str,
    amf_port: u16,
    tac: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Plmn<'a> {
    mcc: &'a str,
    mnc: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Slice<'a> {
    sst: u8,
    sd: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Profile<'a> {
    imsi: &'a str,
    usim_key: &'a str,
    usim_opc: &'a str,
    usim_sequence_number: &'a str,
    icmp_packet_destination: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Upf<'a> {
    ip_addr: &'a str,
    gateway: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpServer<'a> {
    ip_addr: &'a str,
    port: u16,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the configuration document.
///
/// Integer-typed parameters (amf-port, sst, the control port) are emitted as
/// unquoted decimal integers; everything else is emitted verbatim as a
/// string. The gNodeB address is embedded with its prefix length stripped.
pub fn render(params: &GnbParams, control: &ControlEndpoint) -> Result<String> {
    let doc = ConfigDocument {
        info: Info {
            description: "gNodeB simulator configuration",
            version: 1,
        },
        configuration: Configuration {
            gnb: Gnb {
                n2_ip_addr: params.gnb_ip_without_prefix(),
                amf_host_name: &params.amf_hostname,
                amf_port: params.amf_port,
                tac: &params.tac,
            },
            plmn: Plmn {
                mcc: &params.mcc,
                mnc: &params.mnc,
            },
            slice: Slice {
                sst: params.sst,
                sd: &params.sd,
            },
            profile: Profile {
                imsi: &params.imsi,
                usim_key: &params.usim_key,
                usim_opc: &params.usim_opc,
                usim_sequence_number: &params.usim_sequence_number,
                icmp_packet_destination: &params.icmp_packet_destination,
            },
            upf: Upf {
                ip_addr: &params.upf_ip_address,
                gateway: &params.upf_gateway,
            },
            http_server: HttpServer {
                ip_addr: &control.ip,
                port: control.port,
            },
        },
    };

    serde_yaml::to_string(&doc).context("serialize gnb config failed")
}

/// Hex SHA-256 of the rendered artifact, for write logging and the status
/// surface.
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let out = hasher.finalize();
    out.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
