//! gso-reconcile
//!
//! The reconciliation state machine for the gnbsim operator.
//!
//! Architectural decisions:
//! - One idempotent `reconcile` entry point, re-run on every trigger; no
//!   per-trigger handlers and no framework inheritance.
//! - Preconditions are evaluated strictly in order; the first failure is the
//!   terminal outcome of the attempt and later checks are never probed.
//! - Deferral is a typed outcome (`RetryLater`), not in-process sleeping;
//!   the dispatch layer owns redelivery.
//! - A collaborator failure after the gate has passed maps to `Blocked`
//!   with a reason naming the failed step; the loop never crashes.
//!
//! Side effects go through the gso-workload traits only, so the whole
//! machine runs against the recorder double in tests.

mod reconciler;
mod types;

pub use reconciler::Reconciler;
pub use types::{
    ReconcileOutcome, Trigger, UnitStatus, REASON_AMF_DATA, REASON_ATTACHMENT, REASON_CONTAINER,
    REASON_RELATION_MISSING, REASON_STORAGE,
};
