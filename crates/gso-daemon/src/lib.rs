//! gso-daemon
//!
//! HTTP control plane for the gnbsim operator. The daemon owns the unit
//! status and the mutable collaborator views (static config, relation data,
//! attachment readiness); every mutation route funnels into the same
//! reconciliation pass, serialized behind one lock.

pub mod api_types;
pub mod routes;
pub mod state;
