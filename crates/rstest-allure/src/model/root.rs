//! Fallback executable used when no test or step is active.

use std::sync::{Arc, Mutex};

use super::executable::{ExecutableBody, delegate_executable};
use super::record::StepRecord;
use crate::sync::lock;

/// Bare executable receiving calls made outside any test, such as in
/// suite-level setup hooks.
///
/// # Examples
///
/// ```
/// use rstest_allure::{Executable, RootExecutable};
///
/// let root = RootExecutable::new("suite setup");
/// root.start_step("start database");
/// assert_eq!(root.record().steps.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct RootExecutable {
    inner: Arc<Mutex<ExecutableBody>>,
}

impl RootExecutable {
    /// Create a root executable with the given display name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ExecutableBody::new(name))),
        }
    }

    fn with_body<R>(&self, apply: impl FnOnce(&mut ExecutableBody) -> R) -> R {
        apply(&mut *lock(&self.inner))
    }

    /// Snapshot everything recorded against the root.
    #[must_use]
    pub fn record(&self) -> StepRecord {
        self.with_body(|body| body.record())
    }
}

delegate_executable!(RootExecutable);
