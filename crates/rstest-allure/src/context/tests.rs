//! Unit tests for the execution context.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::model::RootExecutable;

#[fixture]
fn rooted() -> ExecutionContext {
    ExecutionContext::with_root(Arc::new(RootExecutable::new("root")))
}

fn current_name(ctx: &ExecutionContext) -> String {
    match ctx.current() {
        Ok(executable) => executable.name(),
        Err(error) => panic!("context should resolve an executable: {error}"),
    }
}

#[test]
fn empty_context_has_no_executable() {
    let ctx = ExecutionContext::new();
    assert!(matches!(
        ctx.current(),
        Err(ReportError::NoActiveExecutable)
    ));
}

#[rstest]
fn resolution_prefers_step_then_test_then_root(mut rooted: ExecutionContext) {
    assert_eq!(current_name(&rooted), "root");

    let test = Test::new("test");
    assert!(rooted.set_current_test(test.clone()).is_none());
    assert_eq!(current_name(&rooted), "test");

    let step = test.start_step("step");
    rooted.push(step.clone());
    assert_eq!(current_name(&rooted), "step");
    assert!(rooted.current_step().is_some_and(|top| top.is_same(&step)));

    assert!(rooted.pop().is_some_and(|popped| popped.is_same(&step)));
    assert_eq!(current_name(&rooted), "test");

    assert!(rooted.clear_current_test().is_some());
    assert_eq!(current_name(&rooted), "root");
}

#[rstest]
fn steps_resolve_without_a_test(mut rooted: ExecutionContext) {
    let root_step = Step::new("hook step");
    rooted.push(root_step);
    assert_eq!(current_name(&rooted), "hook step");
    assert_eq!(rooted.depth(), 1);
}

#[rstest]
fn pop_removes_top_unconditionally(mut rooted: ExecutionContext) {
    rooted.push(Step::new("first"));
    rooted.push(Step::new("second"));
    assert_eq!(rooted.pop().map(|step| step.name()), Some("second".into()));
    assert_eq!(rooted.pop().map(|step| step.name()), Some("first".into()));
    assert!(rooted.pop().is_none());
}

#[test]
fn install_root_enables_resolution() {
    let mut ctx = ExecutionContext::new();
    ctx.install_root(Arc::new(RootExecutable::new("late root")));
    assert_eq!(current_name(&ctx), "late root");
}

#[test]
fn set_current_test_returns_displaced_test() {
    let mut ctx = ExecutionContext::new();
    ctx.set_current_test(Test::new("first"));
    let displaced = ctx.set_current_test(Test::new("second"));
    assert_eq!(displaced.map(|test| test.name()), Some("first".into()));
    assert_eq!(ctx.current_test().map(Executable::name), Some("second".into()));
}

#[test]
fn shared_context_survives_poisoning() {
    let shared = SharedContext::new(ExecutionContext::new());
    let poisoner = shared.clone();
    let result = std::thread::spawn(move || {
        let _guard = poisoner.lock();
        panic!("poison the context");
    })
    .join();
    assert!(result.is_err());
    shared.lock().push(Step::new("after poison"));
    assert_eq!(shared.lock().depth(), 1);
}

#[rstest]
fn unwind_removes_only_steps_opened_under_the_test(mut rooted: ExecutionContext) {
    let hook = Step::new("suite hook");
    rooted.push(hook.clone());
    assert!(rooted.unwind_test_steps().is_empty());

    let test = Test::new("unwound");
    rooted.set_current_test(test.clone());
    let outer = test.start_step("outer");
    let inner = outer.start_step("inner");
    rooted.push(outer.clone());
    rooted.push(inner.clone());

    let leaked = rooted.unwind_test_steps();
    let names: Vec<String> = leaked.iter().map(Executable::name).collect();
    assert_eq!(names, ["inner", "outer"]);
    assert_eq!(rooted.depth(), 1);
    assert!(rooted.contains(&hook));
    assert!(!rooted.contains(&inner));
}
