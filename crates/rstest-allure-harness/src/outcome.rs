//! Classification of test body return values.

use std::fmt::Display;

use rstest_allure::{Status, StatusDetails};

/// A value a test body may return, mapped onto a report status.
///
/// Panics are classified separately by the harness as
/// [`Status::Failed`].
///
/// # Examples
///
/// ```
/// use rstest_allure::Status;
/// use rstest_allure_harness::TestOutcome;
///
/// assert_eq!(().status(), Status::Passed);
///
/// let failed: Result<(), String> = Err("connection refused".into());
/// assert_eq!(failed.status(), Status::Broken);
/// assert_eq!(
///     failed.details().and_then(|details| details.message).as_deref(),
///     Some("connection refused")
/// );
/// ```
pub trait TestOutcome {
    /// Status to record for this outcome.
    fn status(&self) -> Status;

    /// Optional explanation recorded alongside the status.
    fn details(&self) -> Option<StatusDetails> {
        None
    }
}

impl TestOutcome for () {
    fn status(&self) -> Status {
        Status::Passed
    }
}

impl<T, E: Display> TestOutcome for Result<T, E> {
    fn status(&self) -> Status {
        if self.is_ok() {
            Status::Passed
        } else {
            Status::Broken
        }
    }

    fn details(&self) -> Option<StatusDetails> {
        self.as_ref()
            .err()
            .map(|error| StatusDetails::new(error.to_string()))
    }
}
