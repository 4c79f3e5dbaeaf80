//! gso-config
//!
//! Parameter resolution for the gnbsim operator.
//!
//! Architectural decisions:
//! - Every reconciliation attempt resolves a fresh parameter set; nothing is
//!   cached across attempts.
//! - Validation aggregates ALL invalid names in declaration order before
//!   reporting, so the operator sees the full repair list at once.
//! - The AMF endpoint is sourced either from the static store or from the
//!   fiveg-n2 relation, selected once at startup (`SourceMode`); the rest of
//!   the pipeline is shared between the two modes.
//!
//! Deterministic, pure logic. No IO.

mod resolve;
mod types;

pub use resolve::{resolve, InvalidConfigs, Resolved, SourceMode};
pub use types::{AmfEndpoint, GnbParams, N2RelationView, PendingParams, StaticConfig};
