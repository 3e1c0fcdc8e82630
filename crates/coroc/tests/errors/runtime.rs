#[path = "../common/mod.rs"]
mod common;

use common::{load, parse};
use coro_runtime::{RuntimeError, Value};
use coroc::interp::{EvalError, Output, Program};

#[test]
fn unlowered_marker_fails_loudly() {
    let program = Program::load(
        &parse("fn raw(c: &Coroutine<int, int>) { c.begin(); c.yield(1); }"),
        Output::capture().0,
    );
    assert!(!program.has_gen());
    let co = program.create_coroutine("raw", Value::Unit).unwrap();
    let err = co.tick().unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::MarkerInvoked { marker: "begin", ref coroutine } if coroutine == "raw"
    ));
}

#[test]
fn ticking_a_running_coroutine_is_rejected() {
    let (program, _) = load("fn selfish(c: &Coroutine<int, int>) { tick(c); }");
    let co = program.create_coroutine("selfish", Value::Unit).unwrap();
    assert!(matches!(co.tick().unwrap_err(), RuntimeError::Reentrant(name) if name == "selfish"));
}

#[test]
fn delegating_to_itself_is_rejected() {
    let (program, _) = load("fn me(c: &Coroutine<int, int>) { c.begin(); c.yield_to(c); }");
    let co = program.create_coroutine("me", Value::Unit).unwrap();
    assert!(matches!(co.tick().unwrap_err(), RuntimeError::SelfDelegation(_)));
}

#[test]
fn child_failures_reach_the_parent_tick() {
    let (program, _) = load(
        "
fn child(c: &Coroutine<int, int>) {
    c.begin();
    c.yield(1);
    c.yield(1 / c.input);
}

fn parent(c: &Coroutine<int, int>) {
    c.begin();
    c.yield_to(new(child, 0));
}
",
    );
    let co = program.create_coroutine("parent", Value::Unit).unwrap();
    co.tick().unwrap();
    let err = co.tick().unwrap_err();
    let text = err.to_string();
    assert!(text.contains("`child`"), "{}", text);
    assert!(text.contains("division by zero"), "{}", text);
}

#[test]
fn new_requires_a_single_handle_parameter() {
    let (program, _) = load("fn pair(a: int, b: int) {}\nfn main() { new(pair); }");
    assert!(matches!(
        program.call_function("main", vec![]),
        Err(EvalError::Arity { .. })
    ));
}
