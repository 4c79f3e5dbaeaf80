use crate::{GnbParams, N2RelationView, PendingParams, StaticConfig};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Source mode
// ---------------------------------------------------------------------------

/// Where the AMF endpoint comes from. Selected once at startup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SourceMode {
    /// `amf-hostname` / `amf-port` read from the static store like every
    /// other parameter.
    Static,
    /// AMF endpoint supplied over the fiveg-n2 relation; absent until the
    /// handshake completes.
    N2Relation,
}

// ---------------------------------------------------------------------------
// InvalidConfigs
// ---------------------------------------------------------------------------

/// Names of the parameters that are unset, empty, or failed integer parsing.
///
/// Names are listed in declaration order. The `Display` form is the exact
/// Blocked-status reason; external tooling matches on it, so it is frozen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidConfigs {
    names: Vec<&'static str>,
}

impl InvalidConfigs {
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| *n == name)
    }
}

impl std::fmt::Display for InvalidConfigs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configurations are invalid: [{}]", self.names.join(", "))
    }
}

impl std::error::Error for InvalidConfigs {}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Outcome of a successful resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Static mode: the full parameter set.
    Complete(GnbParams),
    /// Relation mode: everything except the AMF endpoint, which the
    /// readiness gate picks up from the relation view separately.
    AwaitingAmf(PendingParams),
}

impl Resolved {
    /// Assemble the complete parameter set, pulling the AMF endpoint from
    /// the relation when this resolution is still awaiting it.
    ///
    /// Returns `None` when the endpoint has not been published yet.
    pub fn into_params(self, relation: &N2RelationView) -> Option<GnbParams> {
        match self {
            Resolved::Complete(params) => Some(params),
            Resolved::AwaitingAmf(pending) => {
                relation.endpoint.clone().map(|amf| pending.with_amf(amf))
            }
        }
    }
}

/// Collects values by fixed key, accumulating invalid names instead of
/// stopping at the first one.
struct Collector<'a> {
    cfg: &'a StaticConfig,
    invalid: Vec<&'static str>,
}

impl<'a> Collector<'a> {
    fn new(cfg: &'a StaticConfig) -> Self {
        Self {
            cfg,
            invalid: Vec::new(),
        }
    }

    fn string(&mut self, key: &'static str) -> String {
        match self.cfg.get(key) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                self.invalid.push(key);
                String::new()
            }
        }
    }

    fn int<T: FromStr + Default>(&mut self, key: &'static str) -> T {
        match self.cfg.get(key).filter(|v| !v.is_empty()) {
            Some(v) => match v.parse::<T>() {
                Ok(n) => n,
                Err(_) => {
                    self.invalid.push(key);
                    T::default()
                }
            },
            None => {
                self.invalid.push(key);
                T::default()
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, InvalidConfigs> {
        if self.invalid.is_empty() {
            Ok(value)
        } else {
            Err(InvalidConfigs {
                names: self.invalid,
            })
        }
    }
}

/// Resolve the parameter set from the static store.
///
/// In [`SourceMode::Static`] the AMF endpoint keys participate in validation
/// like every other parameter. In [`SourceMode::N2Relation`] they are owned
/// by the relation and are not the static store's to get wrong.
pub fn resolve(cfg: &StaticConfig, mode: SourceMode) -> Result<Resolved, InvalidConfigs> {
    let mut c = Collector::new(cfg);

    let amf = match mode {
        SourceMode::Static => {
            let hostname = c.string("amf-hostname");
            let port = c.int::<u16>("amf-port");
            Some((hostname, port))
        }
        SourceMode::N2Relation => None,
    };

    let pending = PendingParams {
        gnb_ip_address: c.string("gnb-ip-address"),
        icmp_packet_destination: c.string("icmp-packet-destination"),
        imsi: c.string("imsi"),
        mcc: c.string("mcc"),
        mnc: c.string("mnc"),
        sd: c.string("sd"),
        sst: c.int::<u8>("sst"),
        tac: c.string("tac"),
        upf_gateway: c.string("upf-gateway"),
        upf_ip_address: c.string("upf-ip-address"),
        usim_key: c.string("usim-key"),
        usim_opc: c.string("usim-opc"),
        usim_sequence_number: c.string("usim-sequence-number"),
    };

    match amf {
        Some((hostname, port)) => c.finish(Resolved::Complete(pending.with_amf(
            crate::AmfEndpoint { hostname, port },
        ))),
        None => c.finish(Resolved::AwaitingAmf(pending)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AmfEndpoint;

    fn full_config() -> StaticConfig {
        StaticConfig::from([
            ("amf-hostname", "amf"),
            ("amf-port", "38412"),
            ("gnb-ip-address", "192.168.251.5/24"),
            ("icmp-packet-destination", "8.8.8.8"),
            ("imsi", "208930100007487"),
            ("mcc", "208"),
            ("mnc", "93"),
            ("sd", "010203"),
            ("sst", "1"),
            ("tac", "000001"),
            ("upf-gateway", "192.168.252.1"),
            ("upf-ip-address", "192.168.252.3"),
            ("usim-key", "5122250214c33e723a5dd523fc145fc0"),
            ("usim-opc", "981d464c7c52eb6e5036234984ad0bcf"),
            ("usim-sequence-number", "16f3b3f70fc2"),
        ])
    }

    // --- Static mode ---

    #[test]
    fn static_mode_resolves_complete_set() {
        let resolved = resolve(&full_config(), SourceMode::Static).unwrap();
        let params = match resolved {
            Resolved::Complete(p) => p,
            other => panic!("expected Complete, got {other:?}"),
        };
        assert_eq!(params.amf_hostname, "amf");
        assert_eq!(params.amf_port, 38412);
        assert_eq!(params.sst, 1);
        assert_eq!(params.gnb_ip_without_prefix(), "192.168.251.5");
    }

    #[test]
    fn missing_names_are_aggregated_in_declaration_order() {
        let mut cfg = full_config();
        cfg.set("usim-key", "");
        cfg.set("amf-hostname", "");
        let err = resolve(&cfg, SourceMode::Static).unwrap_err();
        assert_eq!(err.names(), &["amf-hostname", "usim-key"]);
        assert_eq!(
            err.to_string(),
            "Configurations are invalid: [amf-hostname, usim-key]"
        );
    }

    #[test]
    fn unparsable_integers_are_invalid() {
        let mut cfg = full_config();
        cfg.set("amf-port", "not-a-port");
        cfg.set("sst", "300"); // out of u8 range
        let err = resolve(&cfg, SourceMode::Static).unwrap_err();
        assert_eq!(err.names(), &["amf-port", "sst"]);
    }

    #[test]
    fn unset_key_is_reported_like_empty() {
        let mut cfg = StaticConfig::new();
        // Only one key present; everything else must be listed.
        cfg.set("mcc", "208");
        let err = resolve(&cfg, SourceMode::Static).unwrap_err();
        assert!(err.contains("amf-hostname"));
        assert!(err.contains("usim-sequence-number"));
        assert!(!err.contains("mcc"));
    }

    // --- Relation mode ---

    #[test]
    fn relation_mode_ignores_amf_keys_in_static_store() {
        let mut cfg = full_config();
        cfg.set("amf-hostname", "");
        cfg.set("amf-port", "");
        let resolved = resolve(&cfg, SourceMode::N2Relation).unwrap();
        assert!(matches!(resolved, Resolved::AwaitingAmf(_)));
    }

    #[test]
    fn relation_mode_completes_from_relation_endpoint() {
        let resolved = resolve(&full_config(), SourceMode::N2Relation).unwrap();
        let relation = N2RelationView::with_endpoint(AmfEndpoint {
            hostname: "amf.sdcore".to_string(),
            port: 38412,
        });
        let params = resolved.into_params(&relation).unwrap();
        assert_eq!(params.amf_hostname, "amf.sdcore");
        assert_eq!(params.amf_port, 38412);
    }

    #[test]
    fn relation_mode_without_endpoint_yields_no_params() {
        let resolved = resolve(&full_config(), SourceMode::N2Relation).unwrap();
        assert!(resolved
            .into_params(&N2RelationView::created_without_data())
            .is_none());
    }

    // --- Endpoint parsing ---

    #[test]
    fn amf_endpoint_from_raw_rejects_bad_port() {
        assert!(AmfEndpoint::from_raw(Some("amf"), Some("x")).is_none());
        assert!(AmfEndpoint::from_raw(Some(""), Some("38412")).is_none());
        assert!(AmfEndpoint::from_raw(None, Some("38412")).is_none());
        let ep = AmfEndpoint::from_raw(Some("amf"), Some("38412")).unwrap();
        assert_eq!(ep.port, 38412);
    }

    // --- Determinism ---

    #[test]
    fn resolution_is_deterministic() {
        let cfg = full_config();
        assert_eq!(
            resolve(&cfg, SourceMode::Static),
            resolve(&cfg, SourceMode::Static)
        );
    }
}
