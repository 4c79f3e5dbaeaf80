//! Scenario: every precondition holds, so one pass renders the artifact,
//! writes it, replaces the UPF route, and lands on Active.
//!
//! Also proves idempotence: a second identical pass rewrites the same
//! content and reissues the route replacement without error or drift.

use gso_config::{N2RelationView, SourceMode};
use gso_reconcile::{ReconcileOutcome, Reconciler, Trigger};
use gso_render::{content_digest, ControlEndpoint};
use gso_testkit::{sample_static_config, FakeWorkload, StubAttachment};
use gso_workload::config_file_path;

fn control() -> ControlEndpoint {
    ControlEndpoint::new("10.1.100.4")
}

#[test]
fn all_ready_goes_active_with_artifact_and_route() {
    let workload = FakeWorkload::ready();
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);

    let outcome = reconciler.reconcile(
        &sample_static_config(),
        &N2RelationView::absent(),
        Trigger::ConfigChanged,
    );

    let digest = match outcome {
        ReconcileOutcome::Active { config_digest } => config_digest,
        other => panic!("expected Active, got {other:?}"),
    };

    // Artifact written to the fixed path with the expected fields.
    let content = workload
        .file(&config_file_path())
        .expect("artifact must be written");
    assert!(content.contains("amfHostName: amf"), "{content}");
    assert!(content.contains("amfPort: 38412"), "{content}");
    assert!(content.contains("n2IpAddr: 192.168.251.5"), "{content}");
    assert!(content.contains("ipAddr: 10.1.100.4"), "{content}");
    assert_eq!(digest, content_digest(&content));

    // Exactly one route replacement, with the configured pair.
    let execs = workload.execs();
    assert_eq!(execs.len(), 1);
    assert_eq!(
        execs[0].command,
        vec!["ip", "route", "replace", "192.168.252.3", "via", "192.168.252.1"]
    );
}

#[test]
fn second_pass_is_idempotent() {
    let workload = FakeWorkload::ready();
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);
    let cfg = sample_static_config();
    let relation = N2RelationView::absent();

    let first = reconciler.reconcile(&cfg, &relation, Trigger::ConfigChanged);
    let content_after_first = workload.file(&config_file_path()).unwrap();
    let second = reconciler.reconcile(&cfg, &relation, Trigger::Redelivery);

    assert_eq!(first, second);
    assert_eq!(
        workload.file(&config_file_path()).unwrap(),
        content_after_first
    );
    // Route replacement ran once per pass; replace semantics make the
    // repetition harmless.
    assert_eq!(workload.execs().len(), 2);
}

#[test]
fn stale_artifact_is_overwritten_without_diffing() {
    let workload = FakeWorkload::ready();
    workload.put_file(&config_file_path(), "stale: leftovers\n");
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);

    let outcome = reconciler.reconcile(
        &sample_static_config(),
        &N2RelationView::absent(),
        Trigger::ConfigChanged,
    );

    assert!(matches!(outcome, ReconcileOutcome::Active { .. }));
    let content = workload.file(&config_file_path()).unwrap();
    assert!(!content.contains("stale"), "{content}");
}
