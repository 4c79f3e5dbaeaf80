use gso_config::{GnbParams, StaticConfig};

/// A complete, valid static configuration.
pub fn sample_static_config() -> StaticConfig {
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

/// The parameter set [`sample_static_config`] resolves to in static mode.
pub fn sample_params() -> GnbParams {
    GnbParams {
        amf_hostname: "amf".to_string(),
        amf_port: 38412,
        gnb_ip_address: "192.168.251.5/24".to_string(),
        icmp_packet_destination: "8.8.8.8".to_string(),
        imsi: "208930100007487".to_string(),
        mcc: "208".to_string(),
        mnc: "93".to_string(),
        sd: "010203".to_string(),
        sst: 1,
        tac: "000001".to_string(),
        upf_gateway: "192.168.252.1".to_string(),
        upf_ip_address: "192.168.252.3".to_string(),
        usim_key: "5122250214c33e723a5dd523fc145fc0".to_string(),
        usim_opc: "981d464c7c52eb6e5036234984ad0bcf".to_string(),
        usim_sequence_number: "16f3b3f70fc2".to_string(),
    }
}
