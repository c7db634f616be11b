//! Tokio harness adapter for `rstest-allure`.
//!
//! This crate provides a Tokio-specific harness that runs each reported test
//! inside a current-thread Tokio runtime, for both synchronous runners and
//! runners returning futures.

mod tokio_harness;

pub use tokio_harness::TokioHarness;
