//! Scenario: transient preconditions surface as Waiting, with the exact
//! reason strings the external observer matches on, and with the correct
//! redelivery behavior per source mode.

use gso_config::{AmfEndpoint, N2RelationView, SourceMode};
use gso_reconcile::{
    ReconcileOutcome, Reconciler, Trigger, UnitStatus, REASON_ATTACHMENT, REASON_CONTAINER,
    REASON_STORAGE,
};
use gso_render::ControlEndpoint;
use gso_testkit::{sample_static_config, FakeWorkload, StubAttachment};

fn control() -> ControlEndpoint {
    ControlEndpoint::new("10.1.100.4")
}

fn relation_with_data() -> N2RelationView {
    N2RelationView::with_endpoint(AmfEndpoint {
        hostname: "amf.sdcore".to_string(),
        port: 38412,
    })
}

#[test]
fn unreachable_container_waits_and_wants_redelivery() {
    let workload = FakeWorkload::disconnected();
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);

    let outcome = reconciler.reconcile(
        &sample_static_config(),
        &N2RelationView::absent(),
        Trigger::ConfigChanged,
    );

    assert_eq!(
        outcome,
        ReconcileOutcome::RetryLater {
            reason: REASON_CONTAINER.to_string()
        }
    );
    assert!(outcome.wants_redelivery());
    assert_eq!(
        outcome.unit_status(),
        UnitStatus::Waiting(REASON_CONTAINER.to_string())
    );
}

#[test]
fn detached_storage_waits_and_wants_redelivery() {
    let workload = FakeWorkload::connected_without_storage();
    let attachment = StubAttachment::ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);

    let outcome = reconciler.reconcile(
        &sample_static_config(),
        &N2RelationView::absent(),
        Trigger::StorageAttached,
    );

    assert_eq!(
        outcome,
        ReconcileOutcome::RetryLater {
            reason: REASON_STORAGE.to_string()
        }
    );
}

#[test]
fn attachment_not_ready_in_static_mode_waits_without_redelivery() {
    let workload = FakeWorkload::ready();
    let attachment = StubAttachment::not_ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::Static);

    let outcome = reconciler.reconcile(
        &sample_static_config(),
        &N2RelationView::absent(),
        Trigger::NetworkAttachmentChanged,
    );

    assert_eq!(
        outcome,
        ReconcileOutcome::Waiting {
            reason: REASON_ATTACHMENT.to_string()
        }
    );
    assert!(!outcome.wants_redelivery());
}

#[test]
fn attachment_not_ready_in_relation_mode_defers() {
    let workload = FakeWorkload::ready();
    let attachment = StubAttachment::not_ready();
    let reconciler = Reconciler::new(&workload, &attachment, control(), SourceMode::N2Relation);

    let outcome = reconciler.reconcile(
        &sample_static_config(),
        &relation_with_data(),
        Trigger::NetworkAttachmentChanged,
    );

    assert_eq!(
        outcome,
        ReconcileOutcome::RetryLater {
            reason: REASON_ATTACHMENT.to_string()
        }
    );
}
