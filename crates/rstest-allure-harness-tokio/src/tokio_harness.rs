//! Tokio current-thread harness adapter for reported test execution.

use std::future::Future;

use rstest_allure::Reporter;
use rstest_allure_harness::{HarnessAdapter, TestOutcome, TestRunRequest, run_reported};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

/// Executes test bodies inside a Tokio current-thread runtime with a
/// [`LocalSet`](tokio::task::LocalSet), reporting each one.
///
/// `TokioHarness` builds a new single-threaded runtime and a `LocalSet` per
/// test. [`HarnessAdapter::run`] blocks on a synchronous runner with the
/// runtime active, so `tokio::runtime::Handle::current()` and `spawn_local`
/// work inside it. [`TokioHarness::run_future`] drives a runner that returns
/// a future to completion, which lets test bodies await
/// [`Reporter::step_async`] directly.
///
/// After the body settles the harness performs a single
/// `tokio::task::yield_now().await` tick. Tasks needing more than one poll may
/// still be pending when the harness returns.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rstest_allure::{MemoryAttachmentStore, Reporter, Status};
/// use rstest_allure_harness::{TestMetadata, TestRunRequest, TestRunner};
/// use rstest_allure_harness_tokio::TokioHarness;
///
/// let reporter = Reporter::new(Arc::new(MemoryAttachmentStore::new()));
/// let harness = TokioHarness::new(reporter.clone());
/// let body_reporter = reporter.clone();
/// let request = TestRunRequest::new(
///     TestMetadata::new("orders", "fetches_order", vec![]),
///     TestRunner::new(move || async move {
///         body_reporter
///             .step_async("fetch", |_| async { 2 + 2 })
///             .await
///             .map_err(|error| error.to_string())
///     }),
/// );
/// assert_eq!(harness.run_future(request), Ok(4));
/// assert_eq!(reporter.results()[0].status, Some(Status::Passed));
/// ```
#[derive(Clone, Debug)]
pub struct TokioHarness {
    reporter: Reporter,
}

impl TokioHarness {
    /// Creates a Tokio harness reporting through `reporter`.
    #[must_use]
    pub const fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }

    /// The reporter receiving test records.
    #[must_use]
    pub const fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Runs a request whose runner produces a future, awaiting it inside the
    /// runtime.
    ///
    /// # Panics
    ///
    /// Panics when the Tokio runtime cannot be built, and resumes any panic
    /// raised by the test body after the test has been reported.
    pub fn run_future<T, Fut>(&self, request: TestRunRequest<'_, Fut>) -> T
    where
        T: TestOutcome,
        Fut: Future<Output = T>,
    {
        let runtime = build_runtime();
        let (metadata, runner) = request.into_parts();
        run_reported(&self.reporter, &metadata, || {
            LocalSet::new().block_on(&runtime, async {
                let result = runner.run().await;
                tokio::task::yield_now().await;
                result
            })
        })
    }
}

fn build_runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|err| {
            panic!("rstest-allure-harness-tokio: failed to build Tokio runtime: {err}")
        })
}

impl HarnessAdapter for TokioHarness {
    fn run<T: TestOutcome>(&self, request: TestRunRequest<'_, T>) -> T {
        let runtime = build_runtime();
        let (metadata, runner) = request.into_parts();
        run_reported(&self.reporter, &metadata, || {
            LocalSet::new().block_on(&runtime, async {
                let result = runner.run();
                tokio::task::yield_now().await;
                result
            })
        })
    }
}
