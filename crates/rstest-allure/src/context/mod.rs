//! Execution context tracking the innermost active executable.
//!
//! The context holds the stack of open steps (innermost last), the active
//! test, and a fallback root. [`ExecutionContext::current`] resolves calls in
//! that order. The context is one test-execution unit's state: step lifecycles
//! on it must nest, never interleave. Two concurrent tasks opening steps on the
//! same context will pop each other's entries; callers are responsible for
//! running step bodies logically serially.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ReportError;
use crate::model::{Executable, Step, Test};
use crate::sync::lock;

/// Observer notified when steps open and close.
///
/// Notifications are delivered outside the context lock, start before end,
/// and a child's end before its parent's end.
pub trait StepListener: Send + Sync {
    /// Called after `step` has been pushed onto the context.
    fn on_step_start(&self, _step: &Step) {}

    /// Called after `step` has been popped and ended.
    fn on_step_end(&self, _step: &Step) {}
}

/// Current position in the test → step hierarchy.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rstest_allure::{ExecutionContext, Executable, RootExecutable, Test};
///
/// let mut ctx = ExecutionContext::with_root(Arc::new(RootExecutable::new("root")));
/// assert_eq!(ctx.current()?.name(), "root");
///
/// let test = Test::new("login");
/// ctx.set_current_test(test.clone());
/// assert_eq!(ctx.current()?.name(), "login");
///
/// ctx.push(test.start_step("submit form"));
/// assert_eq!(ctx.current()?.name(), "submit form");
/// # Ok::<(), rstest_allure::ReportError>(())
/// ```
#[derive(Default)]
pub struct ExecutionContext {
    steps: Vec<Step>,
    test: Option<Test>,
    test_base: usize,
    root: Option<Arc<dyn Executable>>,
    listeners: Vec<Arc<dyn StepListener>>,
}

impl ExecutionContext {
    /// Create an empty context with no fallback root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context whose fallback is `root`.
    #[must_use]
    pub fn with_root(root: Arc<dyn Executable>) -> Self {
        Self {
            root: Some(root),
            ..Self::default()
        }
    }

    /// Install or replace the fallback root.
    pub fn install_root(&mut self, root: Arc<dyn Executable>) {
        self.root = Some(root);
    }

    /// Resolve the innermost executable: the top step, else the current test,
    /// else the root.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when the stack is empty, no
    /// test is active, and no root was installed.
    pub fn current(&self) -> Result<Arc<dyn Executable>, ReportError> {
        if let Some(step) = self.steps.last() {
            return Ok(Arc::new(step.clone()));
        }
        if let Some(test) = &self.test {
            return Ok(Arc::new(test.clone()));
        }
        self.root.clone().ok_or(ReportError::NoActiveExecutable)
    }

    /// Make `step` the innermost executable.
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Remove the innermost step, whichever it is.
    pub fn pop(&mut self) -> Option<Step> {
        self.steps.pop()
    }

    /// Whether `step` is anywhere on the stack.
    #[must_use]
    pub fn contains(&self, step: &Step) -> bool {
        self.steps.iter().any(|open| open.is_same(step))
    }

    /// Number of open steps.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// The innermost open step.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Mark `test` as the active test, returning any test it displaces.
    ///
    /// Steps already open stay below the test; only steps opened from here on
    /// are removed by [`unwind_test_steps`](Self::unwind_test_steps).
    pub fn set_current_test(&mut self, test: Test) -> Option<Test> {
        self.test_base = self.steps.len();
        self.test.replace(test)
    }

    /// Remove every step opened since the active test started, innermost
    /// first. Returns nothing when no test is active.
    pub fn unwind_test_steps(&mut self) -> Vec<Step> {
        if self.test.is_none() {
            return Vec::new();
        }
        let base = self.test_base.min(self.steps.len());
        let mut leaked = self.steps.split_off(base);
        leaked.reverse();
        leaked
    }

    /// Clear the active test.
    pub fn clear_current_test(&mut self) -> Option<Test> {
        self.test.take()
    }

    /// The active test, if any.
    #[must_use]
    pub fn current_test(&self) -> Option<&Test> {
        self.test.as_ref()
    }

    /// Register a step listener.
    pub fn add_listener(&mut self, listener: Arc<dyn StepListener>) {
        self.listeners.push(listener);
    }

    /// Registered listeners, cloned so they can be notified after unlocking.
    #[must_use]
    pub fn listeners(&self) -> Vec<Arc<dyn StepListener>> {
        self.listeners.clone()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("steps", &self.steps)
            .field("test", &self.test)
            .field("root", &self.root)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Shared, lockable handle to an [`ExecutionContext`].
///
/// Locking recovers from poisoning so bookkeeping still runs after a step
/// body panics.
#[derive(Clone, Debug, Default)]
pub struct SharedContext(Arc<Mutex<ExecutionContext>>);

impl SharedContext {
    /// Wrap a context for sharing.
    #[must_use]
    pub fn new(context: ExecutionContext) -> Self {
        Self(Arc::new(Mutex::new(context)))
    }

    /// Lock the context.
    pub fn lock(&self) -> MutexGuard<'_, ExecutionContext> {
        lock(&self.0)
    }
}

#[cfg(test)]
mod tests;
