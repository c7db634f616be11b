//! Opening and closing a reported test around a test body.

use std::panic::{self, AssertUnwindSafe};

use log::debug;
use rstest_allure::{Executable, Label, LabelName, Reporter, Status, StatusDetails, Test};

use crate::outcome::TestOutcome;
use crate::panic::panic_message;
use crate::runner::TestMetadata;

/// Run `body` as the reported test described by `metadata`.
///
/// The test is created with a `suite` label from the module path and a `tag`
/// label per metadata tag, then started on `reporter`, which flushes any
/// buffered labels onto it. The body's return value sets the status through
/// [`TestOutcome`]. A panic marks the test [`Status::Failed`] with the panic
/// message and is resumed unchanged once the test has been finished.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rstest_allure::{MemoryAttachmentStore, Reporter, Status};
/// use rstest_allure_harness::{TestMetadata, run_reported};
///
/// let reporter = Reporter::new(Arc::new(MemoryAttachmentStore::new()));
/// let metadata = TestMetadata::new("billing", "refund_rejected", vec![]);
///
/// let outcome: Result<(), String> =
///     run_reported(&reporter, &metadata, || Err("gateway timeout".into()));
/// assert!(outcome.is_err());
/// assert_eq!(reporter.results()[0].status, Some(Status::Broken));
/// ```
pub fn run_reported<T: TestOutcome>(
    reporter: &Reporter,
    metadata: &TestMetadata,
    body: impl FnOnce() -> T,
) -> T {
    let test = Test::new(metadata.test_name());
    test.set_full_name(metadata.full_name());
    test.add_label(Label::new(LabelName::Suite.as_str(), metadata.module_path()));
    for tag in metadata.tags() {
        test.add_label(Label::new(LabelName::Tag.as_str(), tag.as_str()));
    }
    reporter.start_test(test.clone());

    let outcome = panic::catch_unwind(AssertUnwindSafe(body));
    match &outcome {
        Ok(value) => {
            test.set_status(value.status());
            if let Some(details) = value.details() {
                test.set_status_details(details);
            }
        }
        Err(payload) => {
            test.set_status(Status::Failed);
            test.set_status_details(StatusDetails::new(panic_message(payload.as_ref())));
        }
    }
    reporter.finish_test();
    debug!(
        "reported test {} as {}",
        metadata.full_name(),
        test.status().map_or("unknown", Status::as_str)
    );

    match outcome {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}
