//! Unit tests for step execution bookkeeping.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rstest::{fixture, rstest};

use super::*;
use crate::context::ExecutionContext;
use crate::model::{RootExecutable, Stage, Status};

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl EventLog {
    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn push(&self, event: String) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl StepListener for EventLog {
    fn on_step_start(&self, step: &Step) {
        self.push(format!("start {}", step.name()));
    }

    fn on_step_end(&self, step: &Step) {
        self.push(format!("end {}", step.name()));
    }
}

struct Harness {
    root: Arc<RootExecutable>,
    context: SharedContext,
    events: Arc<EventLog>,
}

#[fixture]
fn harness() -> Harness {
    let root = Arc::new(RootExecutable::new("root"));
    let mut context = ExecutionContext::with_root(root.clone());
    let events = Arc::new(EventLog::default());
    context.add_listener(events.clone());
    Harness {
        root,
        context: SharedContext::new(context),
        events,
    }
}

fn finished(root: &RootExecutable, name: &str) -> bool {
    root.record()
        .step(name)
        .is_some_and(|step| step.stage == Stage::Finished)
}

#[rstest]
fn run_step_returns_body_value(harness: Harness) {
    let value = run_step(&harness.context, "compute", |_| 7);
    assert!(matches!(value, Ok(7)));
    assert!(finished(&harness.root, "compute"));
    assert_eq!(harness.context.lock().depth(), 0);
    assert_eq!(harness.events.events(), ["start compute", "end compute"]);
}

#[rstest]
fn run_step_passes_body_errors_through(harness: Harness) {
    #[derive(Debug, PartialEq)]
    struct Rejected(&'static str);

    let result = run_step(&harness.context, "validate", |_| {
        Err::<(), _>(Rejected("bad input"))
    });
    assert!(matches!(result, Ok(Err(Rejected("bad input")))));
    assert!(finished(&harness.root, "validate"));
    assert_eq!(harness.context.lock().depth(), 0);
}

#[rstest]
fn panicking_body_still_ends_step(harness: Harness) {
    let outcome: std::thread::Result<Result<(), ReportError>> =
        catch_unwind(AssertUnwindSafe(|| {
            run_step(&harness.context, "explode", |_| panic!("boom"))
        }));
    let Err(payload) = outcome else {
        panic!("panic should propagate out of run_step");
    };
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"boom"));
    assert!(finished(&harness.root, "explode"));
    assert_eq!(harness.context.lock().depth(), 0);
    assert_eq!(harness.events.events(), ["start explode", "end explode"]);
}

#[rstest]
fn nested_steps_end_inner_first(harness: Harness) {
    let result = run_step(&harness.context, "outer", |_| {
        assert_eq!(harness.context.lock().depth(), 1);
        run_step(&harness.context, "inner", |inner| {
            assert_eq!(harness.context.lock().depth(), 2);
            inner.set_status(Status::Passed);
        })
    });
    assert!(matches!(result, Ok(Ok(()))));
    assert_eq!(
        harness.events.events(),
        ["start outer", "start inner", "end inner", "end outer"]
    );
    let record = harness.root.record();
    let inner = record
        .step("outer")
        .and_then(|outer| outer.step("inner"))
        .map(|inner| (inner.status, inner.stage));
    assert_eq!(inner, Some((Some(Status::Passed), Stage::Finished)));
}

#[rstest]
fn body_sees_its_own_step_as_current(harness: Harness) {
    let names = run_step(&harness.context, "current", |step| {
        let current = harness.context.lock().current().map(|exec| exec.name());
        (step.name(), current.ok())
    });
    assert!(matches!(
        names,
        Ok((ref step, Some(ref current))) if step == "current" && current == "current"
    ));
}

#[test]
fn entering_without_executable_fails_without_running_body() {
    let context = SharedContext::new(ExecutionContext::new());
    let mut ran = false;
    let result = run_step(&context, "orphan", |_| ran = true);
    assert!(matches!(result, Err(ReportError::NoActiveExecutable)));
    assert!(!ran);
}

#[rstest]
fn guard_finishes_exactly_once(harness: Harness) {
    let guard = StepGuard::enter(&harness.context, "explicit");
    let Ok(guard) = guard else {
        panic!("root should accept the step");
    };
    let step = guard.step().clone();
    guard.finish();
    assert!(step.is_finished());
    assert!(!step.end());
    assert_eq!(harness.events.events(), ["start explicit", "end explicit"]);
}

#[rstest]
fn interleaved_guards_pop_top_unconditionally(harness: Harness) {
    let (Ok(first), Ok(second)) = (
        StepGuard::enter(&harness.context, "first"),
        StepGuard::enter(&harness.context, "second"),
    ) else {
        panic!("root should accept both steps");
    };
    let (first_step, second_step) = (first.step().clone(), second.step().clone());

    drop(first);
    {
        let ctx = harness.context.lock();
        assert_eq!(ctx.depth(), 1);
        assert!(!ctx.contains(&second_step));
        assert!(ctx.current_step().is_some_and(|top| top.is_same(&first_step)));
    }
    assert!(first_step.is_finished());
    assert!(!second_step.is_finished());

    drop(second);
    assert_eq!(harness.context.lock().depth(), 0);
    assert!(second_step.is_finished());
    let nested = harness
        .root
        .record()
        .step("first")
        .and_then(|first| first.step("second"))
        .map(|second| second.stage);
    assert_eq!(nested, Some(Stage::Finished));
}

#[rstest]
fn guard_for_step_closed_elsewhere_leaves_stack_alone(harness: Harness) {
    let Ok(guard) = StepGuard::enter(&harness.context, "unwound") else {
        panic!("root should accept the step");
    };
    let unwound = harness.context.lock().pop();
    assert!(unwound.is_some_and(|step| step.end()));
    let Ok(later) = StepGuard::enter(&harness.context, "later") else {
        panic!("root should accept the step");
    };

    drop(guard);
    assert_eq!(harness.context.lock().depth(), 1);
    assert!(!later.step().is_finished());
    later.finish();
    assert_eq!(
        harness.events.events(),
        ["start unwound", "start later", "end later"]
    );
}

#[rstest]
#[tokio::test]
async fn async_step_stays_open_until_future_settles(harness: Harness) {
    let context = harness.context.clone();
    let result = run_step_async(&harness.context, "fetch", |step| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(context.lock().depth(), 1);
        assert!(!step.is_finished());
        Ok::<_, String>("payload")
    })
    .await;
    assert!(matches!(result, Ok(Ok("payload"))));
    assert!(finished(&harness.root, "fetch"));
    assert_eq!(harness.context.lock().depth(), 0);
}

#[rstest]
#[tokio::test]
async fn async_step_passes_rejections_through(harness: Harness) {
    let result = run_step_async(&harness.context, "upload", |_| async {
        Err::<(), _>(String::from("503 from storage"))
    })
    .await;
    assert!(matches!(result, Ok(Err(ref message)) if message == "503 from storage"));
    assert!(finished(&harness.root, "upload"));
}

#[rstest]
#[tokio::test]
async fn dropped_async_step_is_ended(harness: Harness) {
    let pending = run_step_async(&harness.context, "slow", |_| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
    });
    let timed_out = tokio::time::timeout(Duration::from_millis(5), pending).await;
    assert!(timed_out.is_err());
    assert!(finished(&harness.root, "slow"));
    assert_eq!(harness.context.lock().depth(), 0);
    assert_eq!(harness.events.events(), ["start slow", "end slow"]);
}

#[test]
fn listeners_may_rely_on_default_hooks() {
    struct Silent;
    impl StepListener for Silent {}

    let mut context = ExecutionContext::with_root(Arc::new(RootExecutable::new("root")));
    context.add_listener(Arc::new(Silent));
    let shared = SharedContext::new(context);
    assert!(matches!(run_step(&shared, "quiet", |_| 3), Ok(3)));
    assert_eq!(shared.lock().depth(), 0);
}
