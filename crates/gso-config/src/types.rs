use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only key/value configuration store.
///
/// All values are strings, as delivered by the hosting environment; integer
/// parsing is part of validation, not of loading. Backed by a `BTreeMap` so
/// iteration order is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticConfig(BTreeMap<String, String>);

impl StaticConfig {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Value for `key`, or `None` when unset.
    ///
    /// An empty string is returned as-is; emptiness is an invalidity
    /// condition, decided by validation, not a missing key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }
}

impl<const N: usize> From<[(&str, &str); N]> for StaticConfig {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// AMF control-plane endpoint, already parsed into its typed form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmfEndpoint {
    pub hostname: String,
    pub port: u16,
}

impl AmfEndpoint {
    /// Build from the raw string fields of a relation databag.
    ///
    /// Returns `None` when either field is unset/empty or the port does not
    /// parse — the endpoint is then treated as not yet populated.
    pub fn from_raw(hostname: Option<&str>, port: Option<&str>) -> Option<Self> {
        let hostname = hostname.filter(|h| !h.is_empty())?;
        let port = port?.parse::<u16>().ok()?;
        Some(Self {
            hostname: hostname.to_string(),
            port,
        })
    }
}

/// Current view of the fiveg-n2 relation, as last observed.
///
/// The core only ever reads this; the hosting layer updates it when relation
/// events arrive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct N2RelationView {
    /// The relation exists in the topology.
    pub created: bool,
    /// AMF endpoint received over the relation; `None` until the remote side
    /// has published both hostname and port.
    pub endpoint: Option<AmfEndpoint>,
}

impl N2RelationView {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn created_without_data() -> Self {
        Self {
            created: true,
            endpoint: None,
        }
    }

    pub fn with_endpoint(endpoint: AmfEndpoint) -> Self {
        Self {
            created: true,
            endpoint: Some(endpoint),
        }
    }
}

/// The complete, validated parameter set consumed by the renderer.
///
/// Field order is the canonical declaration order used everywhere a stable
/// parameter ordering is required (invalid-name listings, rendered output).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GnbParams {
    pub amf_hostname: String,
    pub amf_port: u16,
    /// gNodeB address in CIDR form, e.g. `192.168.251.5/24`.
    pub gnb_ip_address: String,
    pub icmp_packet_destination: String,
    pub imsi: String,
    pub mcc: String,
    pub mnc: String,
    pub sd: String,
    pub sst: u8,
    pub tac: String,
    pub upf_gateway: String,
    pub upf_ip_address: String,
    pub usim_key: String,
    pub usim_opc: String,
    pub usim_sequence_number: String,
}

impl GnbParams {
    /// Host part of `gnb_ip_address`, with the prefix length stripped.
    ///
    /// The attachment annotation wants the full CIDR; the rendered config
    /// wants the bare address.
    pub fn gnb_ip_without_prefix(&self) -> &str {
        self.gnb_ip_address
            .split('/')
            .next()
            .unwrap_or(&self.gnb_ip_address)
    }
}

/// Parameters validated from the static store in relation-sourced mode,
/// still awaiting the AMF endpoint from the peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingParams {
    pub gnb_ip_address: String,
    pub icmp_packet_destination: String,
    pub imsi: String,
    pub mcc: String,
    pub mnc: String,
    pub sd: String,
    pub sst: u8,
    pub tac: String,
    pub upf_gateway: String,
    pub upf_ip_address: String,
    pub usim_key: String,
    pub usim_opc: String,
    pub usim_sequence_number: String,
}

impl PendingParams {
    /// Complete the set once the peer has supplied the AMF endpoint.
    pub fn with_amf(self, amf: AmfEndpoint) -> GnbParams {
        GnbParams {
            amf_hostname: amf.hostname,
            amf_port: amf.port,
            gnb_ip_address: self.gnb_ip_address,
            icmp_packet_destination: self.icmp_packet_destination,
            imsi: self.imsi,
            mcc: self.mcc,
            mnc: self.mnc,
            sd: self.sd,
            sst: self.sst,
            tac: self.tac,
            upf_gateway: self.upf_gateway,
            upf_ip_address: self.upf_ip_address,
            usim_key: self.usim_key,
            usim_opc: self.usim_opc,
            usim_sequence_number: self.usim_sequence_number,
        }
    }
}
