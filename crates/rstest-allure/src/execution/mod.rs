//! Step execution with symmetric start and end bookkeeping.
//!
//! [`StepGuard`] is the single exit path for every step: entering starts a
//! nested step on the current executable and pushes it onto the context;
//! finishing or dropping the guard pops it and ends it. Because the guard runs
//! on drop, the step closes on normal return, on an `Err` value, while a panic
//! unwinds, and when an in-flight future is dropped.
//!
//! [`run_step`] and [`run_step_async`] wrap a body in a guard. The body's
//! return value, including any `Err` it produces, is handed back unchanged.
//! Step status is left to the body through the [`Step`] handle it receives.

use std::future::Future;
use std::sync::Arc;

use log::{debug, warn};

use crate::context::{SharedContext, StepListener};
use crate::error::ReportError;
use crate::model::{Executable, Step};

/// RAII scope for one open step.
///
/// Guards on one context must be dropped in reverse order of creation. Popping
/// a step other than the innermost one means two lifecycles interleaved on the
/// same context; this is logged and not corrected. A step already ended and
/// removed by [`Reporter::finish_test`](crate::Reporter::finish_test) is left
/// alone when its guard drops later.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rstest_allure::{
///     ExecutionContext, Executable, RootExecutable, SharedContext, StepGuard,
/// };
///
/// let root = Arc::new(RootExecutable::new("root"));
/// let context = SharedContext::new(ExecutionContext::with_root(root.clone()));
///
/// let guard = StepGuard::enter(&context, "prepare fixtures")?;
/// assert_eq!(context.lock().depth(), 1);
/// guard.finish();
///
/// assert_eq!(context.lock().depth(), 0);
/// assert!(root.record().step("prepare fixtures").is_some_and(|step| step.stop.is_some()));
/// # Ok::<(), rstest_allure::ReportError>(())
/// ```
#[derive(Debug)]
#[must_use = "dropping the guard ends the step immediately"]
pub struct StepGuard {
    context: SharedContext,
    step: Step,
    open: bool,
}

impl StepGuard {
    /// Start a step named `name` on the current executable and make it the
    /// innermost one.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when the context cannot
    /// resolve an executable to own the step.
    pub fn enter(context: &SharedContext, name: &str) -> Result<Self, ReportError> {
        let (step, listeners) = {
            let mut ctx = context.lock();
            let parent = ctx.current()?;
            let step = parent.start_step(name);
            ctx.push(step.clone());
            debug!("step started: {name} (depth {})", ctx.depth());
            (step, ctx.listeners())
        };
        notify(&listeners, |listener| listener.on_step_start(&step));
        Ok(Self {
            context: context.clone(),
            step,
            open: true,
        })
    }

    /// Handle to the open step.
    #[must_use]
    pub fn step(&self) -> &Step {
        &self.step
    }

    /// Pop and end the step now.
    pub fn finish(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        let listeners = {
            let mut ctx = self.context.lock();
            if self.step.is_finished() && !ctx.contains(&self.step) {
                debug!(
                    "step `{}` was already closed with its test",
                    self.step.name()
                );
                return;
            }
            match ctx.pop() {
                Some(popped) if popped.is_same(&self.step) => {}
                Some(popped) => warn!(
                    "step `{}` closed while `{}` was innermost; step lifecycles on one context must nest",
                    self.step.name(),
                    popped.name()
                ),
                None => warn!(
                    "step `{}` closed on an empty context stack",
                    self.step.name()
                ),
            }
            ctx.listeners()
        };
        if !self.step.end() {
            warn!("step `{}` was already ended", self.step.name());
        }
        debug!("step finished: {}", self.step.name());
        notify(&listeners, |listener| listener.on_step_end(&self.step));
    }
}

impl Drop for StepGuard {
    fn drop(&mut self) {
        self.close();
    }
}

pub(crate) fn notify(
    listeners: &[Arc<dyn StepListener>],
    event: impl Fn(&dyn StepListener),
) {
    for listener in listeners {
        event(listener.as_ref());
    }
}

/// Run `body` as a step named `name`.
///
/// The body runs without any lock held and may open nested steps through the
/// same context. Its return value is passed through unchanged. A panic in the
/// body ends the step while unwinding and then continues unchanged.
///
/// # Errors
///
/// Returns [`ReportError::NoActiveExecutable`] when no executable can own the
/// step. The body is not run in that case.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rstest_allure::{
///     run_step, ExecutionContext, Executable, RootExecutable, SharedContext, Status,
/// };
///
/// let root = Arc::new(RootExecutable::new("root"));
/// let context = SharedContext::new(ExecutionContext::with_root(root.clone()));
///
/// let parsed = run_step(&context, "parse", |step| {
///     step.set_status(Status::Passed);
///     "42".parse::<u32>()
/// })?;
/// assert_eq!(parsed, Ok(42));
/// # Ok::<(), rstest_allure::ReportError>(())
/// ```
pub fn run_step<T>(
    context: &SharedContext,
    name: &str,
    body: impl FnOnce(&Step) -> T,
) -> Result<T, ReportError> {
    let guard = StepGuard::enter(context, name)?;
    let value = body(guard.step());
    guard.finish();
    Ok(value)
}

/// Run the future produced by `body` as a step named `name`.
///
/// The step opens when the returned future is first polled and stays open
/// until the body's future settles. Dropping the returned future before it
/// completes still ends the step.
///
/// # Errors
///
/// Returns [`ReportError::NoActiveExecutable`] when no executable can own the
/// step. The body is not called in that case.
pub async fn run_step_async<T, F, Fut>(
    context: &SharedContext,
    name: &str,
    body: F,
) -> Result<T, ReportError>
where
    F: FnOnce(Step) -> Fut,
    Fut: Future<Output = T>,
{
    let guard = StepGuard::enter(context, name)?;
    let value = body(guard.step().clone()).await;
    guard.finish();
    Ok(value)
}

#[cfg(test)]
mod tests;
