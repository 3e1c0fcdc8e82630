#[path = "../common/mod.rs"]
mod common;

use common::{done_flags, load, ticks};
use coro_runtime::Value;

#[test]
fn loop_yields_once_per_iteration() {
    let (program, printed) = load(
        r#"
fn tens(c: &Coroutine<int, int>) {
    c.begin();
    for let i = 0; i < c.input; i = i + 1 {
        print("iter", i);
        c.yield(i * 10);
    }
    print("after");
}
"#,
    );
    let t = ticks(&program, "tens", Value::Int(3), 5);
    let outs: Vec<Value> = t[..3].iter().map(|(v, _)| v.clone()).collect();
    assert_eq!(outs, vec![Value::Int(0), Value::Int(10), Value::Int(20)]);
    assert_eq!(done_flags(&t), vec![false, false, false, true, true]);
    assert_eq!(*printed.borrow(), vec!["iter 0", "iter 1", "iter 2", "after"]);
}

#[test]
fn empty_loop_falls_through() {
    let (program, _) = load(
        "
fn none(c: &Coroutine<int, int>) {
    c.begin();
    for let i = 0; i < c.input; i = i + 1 {
        c.yield(i);
    }
    c.yield(-1);
}
",
    );
    let t = ticks(&program, "none", Value::Int(0), 2);
    assert_eq!(t[0], (Value::Int(-1), false));
    assert!(t[1].1);
}

#[test]
fn while_loops_resume_at_the_retest() {
    let (program, _) = load(
        "
fn halve(c: &Coroutine<int, int>) {
    c.begin();
    let n = c.input;
    while n > 1 {
        n = n / 2;
        c.yield(n);
    }
}
",
    );
    let t = ticks(&program, "halve", Value::Int(20), 6);
    let outs: Vec<Value> = t[..4].iter().map(|(v, _)| v.clone()).collect();
    assert_eq!(outs, vec![Value::Int(10), Value::Int(5), Value::Int(2), Value::Int(1)]);
    assert_eq!(done_flags(&t), vec![false, false, false, false, true, true]);
}

#[test]
fn single_point_under_a_condition_inside_a_loop() {
    let (program, _) = load(
        "
fn odds(c: &Coroutine<int, int>) {
    c.begin();
    for let i = 0; i < 6; i = i + 1 {
        if i % 2 == 1 {
            c.yield(i);
        }
    }
}
",
    );
    let t = ticks(&program, "odds", Value::Unit, 4);
    assert_eq!(t[0], (Value::Int(1), false));
    assert_eq!(t[1], (Value::Int(3), false));
    assert_eq!(t[2], (Value::Int(5), false));
    assert!(t[3].1);
}

#[test]
fn statements_after_the_point_run_before_the_post_step() {
    let (program, printed) = load(
        r#"
fn steps(c: &Coroutine<int, int>) {
    c.begin();
    for let i = 0; i < 2; i = i + 1 {
        c.yield(i);
        print("tail", i);
    }
}
"#,
    );
    let co = program.create_coroutine("steps", Value::Unit).unwrap();
    co.tick().unwrap();
    assert!(printed.borrow().is_empty());
    co.tick().unwrap();
    assert_eq!(*printed.borrow(), vec!["tail 0"]);
    assert!(co.tick().unwrap().done);
    assert_eq!(*printed.borrow(), vec!["tail 0", "tail 1"]);
}

#[test]
fn nested_loops_resume_in_the_inner_loop() {
    let (program, _) = load(
        "
fn grid(c: &Coroutine<int, int>) {
    c.begin();
    for let i = 0; i < 2; i = i + 1 {
        for let j = 0; j < 2; j = j + 1 {
            c.yield(i * 10 + j);
        }
    }
    c.yield(99);
}
",
    );
    let t = ticks(&program, "grid", Value::Unit, 6);
    let outs: Vec<Value> = t[..5].iter().map(|(v, _)| v.clone()).collect();
    assert_eq!(
        outs,
        vec![Value::Int(0), Value::Int(1), Value::Int(10), Value::Int(11), Value::Int(99)]
    );
    assert_eq!(done_flags(&t), vec![false, false, false, false, false, true]);
}
