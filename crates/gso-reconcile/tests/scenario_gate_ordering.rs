//! Scenario: the readiness gate is strictly ordered and first-failure-wins.
//!
//! When a check fails, nothing after it may be probed and no side effect
//! may occur. The fake workload records every probe, push, and exec, and
//! the stub attachment counts its consultations, so "never evaluated" is
//! asserted directly rather than inferred.

use gso_config::{N2RelationView, SourceMode};
use gso_reconcile::{ReconcileOutcome, Reconciler, Trigger};
use gso_render::ControlEndpoint;
use gso_testkit::{sample_static_config, FakeWorkload, StubAttachment};
use gso_workload::config_file_path;

fn control() -> ControlEndpoint {
    ControlEndpoint::new("10.1.100.4")
}

#[test]
fn invalid_config_blocks_before_any_probe_or_side_effect() {
    let mut cfg = sample_static_config();
    cfg.set("usim-key", "");

    let workload = FakeWorkload::ready();
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);

    let outcome = reconciler.reconcile(&cfg, &N2RelationView::absent(), Trigger::ConfigChanged);

    assert_eq!(
        outcome,
        ReconcileOutcome::Blocked {
            reason: "Configurations are invalid: [usim-key]".to_string()
        }
    );
    assert!(workload.probes().is_empty(), "{:?}", workload.probes());
    assert!(workload.execs().is_empty());
    assert!(workload.file(&config_file_path()).is_none());
    assert_eq!(attachment.probe_count(), 0);
}

#[test]
fn blocked_reason_lists_every_invalid_name_in_order() {
    let mut cfg = sample_static_config();
    cfg.set("amf-port", "nope");
    cfg.set("usim-key", "");

    let workload = FakeWorkload::ready();
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);

    let outcome = reconciler.reconcile(&cfg, &N2RelationView::absent(), Trigger::ConfigChanged);

    assert_eq!(
        outcome,
        ReconcileOutcome::Blocked {
            reason: "Configurations are invalid: [amf-port, usim-key]".to_string()
        }
    );
}

#[test]
fn unreachable_workload_stops_before_storage_probe() {
    let workload = FakeWorkload::disconnected();
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);

    let outcome = reconciler.reconcile(
        &sample_static_config(),
        &N2RelationView::absent(),
        Trigger::ConfigChanged,
    );

    assert!(matches!(outcome, ReconcileOutcome::RetryLater { .. }));
    assert_eq!(workload.probes(), vec!["can_connect".to_string()]);
    assert_eq!(attachment.probe_count(), 0);
}

#[test]
fn missing_storage_stops_before_attachment_probe() {
    let workload = FakeWorkload::connected_without_storage();
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);

    let outcome = reconciler.reconcile(
        &sample_static_config(),
        &N2RelationView::absent(),
        Trigger::ConfigChanged,
    );

    assert!(matches!(outcome, ReconcileOutcome::RetryLater { .. }));
    assert_eq!(
        workload.probes(),
        vec!["can_connect".to_string(), "exists:/etc/gnbsim".to_string()]
    );
    assert_eq!(attachment.probe_count(), 0);
}

#[test]
fn missing_relation_blocks_before_workload_probe() {
    let workload = FakeWorkload::ready();
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::N2Relation);

    let outcome = reconciler.reconcile(
        &sample_static_config(),
        &N2RelationView::absent(),
        Trigger::ConfigChanged,
    );

    assert!(matches!(outcome, ReconcileOutcome::Blocked { .. }));
    assert!(workload.probes().is_empty());
    assert_eq!(attachment.probe_count(), 0);
}
