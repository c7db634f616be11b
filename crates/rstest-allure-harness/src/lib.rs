//! Harness adapter contracts for `rstest-allure`.
//!
//! This crate opens a reported test around each test body, classifies the
//! body's outcome into a report status, and hands finished records to the
//! [`Reporter`](rstest_allure::Reporter) collector. Harness adapters choose the
//! environment the body runs in.

mod adapter;
mod lifecycle;
mod outcome;
mod panic;
mod runner;
mod std_harness;

pub use adapter::HarnessAdapter;
pub use lifecycle::run_reported;
pub use outcome::TestOutcome;
pub use panic::panic_message;
pub use runner::{TestMetadata, TestRunRequest, TestRunner};
pub use std_harness::StdHarness;
