//! Nested step handle.

use std::sync::{Arc, Mutex};

use super::executable::{ExecutableBody, delegate_executable};
use super::record::StepRecord;
use super::{Stage, Status};
use crate::sync::lock;

/// A nested, named unit of reported work.
///
/// Steps are created by [`Executable::start_step`](super::Executable::start_step)
/// and owned by the executable that started them. Clones share state, so the
/// handle passed to a step body observes the same entity recorded in the
/// parent.
#[derive(Clone, Debug)]
pub struct Step {
    inner: Arc<Mutex<ExecutableBody>>,
}

impl Step {
    /// Create a detached running step.
    ///
    /// Custom [`Executable`](super::Executable) implementations use this to
    /// build the step they return from `start_step`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ExecutableBody::new(name))),
        }
    }

    fn with_body<R>(&self, apply: impl FnOnce(&mut ExecutableBody) -> R) -> R {
        apply(&mut *lock(&self.inner))
    }

    /// Current status, if one was set.
    #[must_use]
    pub fn status(&self) -> Option<Status> {
        self.with_body(|body| body.status)
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.with_body(|body| body.stage)
    }

    /// Whether the step has been ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stage() == Stage::Finished
    }

    /// Mark the step finished and stamp its stop time.
    ///
    /// Returns `false`, leaving the step untouched, when it had already ended.
    ///
    /// # Examples
    ///
    /// ```
    /// use rstest_allure::Step;
    ///
    /// let step = Step::new("open page");
    /// assert!(step.end());
    /// assert!(!step.end());
    /// assert!(step.is_finished());
    /// ```
    pub fn end(&self) -> bool {
        self.with_body(ExecutableBody::end)
    }

    /// Whether `other` is a handle to the same step.
    #[must_use]
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Snapshot the step and its descendants.
    #[must_use]
    pub fn record(&self) -> StepRecord {
        self.with_body(|body| body.record())
    }
}

delegate_executable!(Step);
