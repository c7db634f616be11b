//! Default synchronous harness implementation.

use rstest_allure::Reporter;

use crate::adapter::HarnessAdapter;
use crate::lifecycle::run_reported;
use crate::outcome::TestOutcome;
use crate::runner::TestRunRequest;

/// Framework-agnostic synchronous harness.
///
/// `StdHarness` executes the test runner directly on the calling thread,
/// wrapped in a reported test on its [`Reporter`].
#[derive(Clone, Debug)]
pub struct StdHarness {
    reporter: Reporter,
}

impl StdHarness {
    /// Creates a harness reporting through `reporter`.
    #[must_use]
    pub const fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }

    /// The reporter receiving test records.
    #[must_use]
    pub const fn reporter(&self) -> &Reporter {
        &self.reporter
    }
}

impl HarnessAdapter for StdHarness {
    fn run<T: TestOutcome>(&self, request: TestRunRequest<'_, T>) -> T {
        let (metadata, runner) = request.into_parts();
        run_reported(&self.reporter, &metadata, || runner.run())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest_allure::{MemoryAttachmentStore, Status};

    use super::*;
    use crate::{TestMetadata, TestRunner};

    #[test]
    fn std_harness_runs_and_reports_request() {
        let harness = StdHarness::new(Reporter::new(Arc::new(MemoryAttachmentStore::new())));
        let request = TestRunRequest::new(
            TestMetadata::new("simple", "runs_synchronously", vec!["sync".to_string()]),
            TestRunner::new(|| ()),
        );
        harness.run(request);
        let results = harness.reporter().results();
        assert_eq!(
            results.first().and_then(|record| record.status),
            Some(Status::Passed)
        );
    }
}
