//! gso-testkit
//!
//! Test doubles and fixtures shared by the scenario tests of the other
//! crates. Nothing here is production code.
//!
//! `FakeWorkload` records every probe and side effect so tests can assert
//! not only outcomes but also what was — and was not — touched.

mod fake_workload;
mod fixtures;

pub use fake_workload::{FakeWorkload, RecordedExec, StubAttachment};
pub use fixtures::{sample_params, sample_static_config};
