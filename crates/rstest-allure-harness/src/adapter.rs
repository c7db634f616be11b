//! Harness adapter trait for reported test execution.

use crate::outcome::TestOutcome;
use crate::runner::TestRunRequest;

/// Runs test bodies inside a harness-specific environment, reporting each one.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rstest_allure::{MemoryAttachmentStore, Reporter};
/// use rstest_allure_harness::{
///     HarnessAdapter, StdHarness, TestMetadata, TestRunRequest, TestRunner,
/// };
///
/// let harness = StdHarness::new(Reporter::new(Arc::new(MemoryAttachmentStore::new())));
/// let request = TestRunRequest::new(
///     TestMetadata::new("demo", "adds", vec![]),
///     TestRunner::new(|| Ok::<_, String>(5 + 5)),
/// );
/// assert_eq!(harness.run(request), Ok(10));
/// assert_eq!(harness.reporter().results().len(), 1);
/// ```
pub trait HarnessAdapter {
    /// Executes one test request and returns the runner result.
    fn run<T: TestOutcome>(&self, request: TestRunRequest<'_, T>) -> T;
}
