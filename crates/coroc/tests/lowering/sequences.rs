#[path = "../common/mod.rs"]
mod common;

use common::{done_flags, load, ticks};
use coro_runtime::Value;

const TWO: &str = "
fn two(c: &Coroutine<int, int>) {
    c.begin();
    c.yield(1);
    c.yield(2);
}
";

#[test]
fn two_yields_then_done_forever() {
    let (program, _) = load(TWO);
    let t = ticks(&program, "two", Value::Unit, 5);
    assert_eq!(t[0], (Value::Int(1), false));
    assert_eq!(t[1], (Value::Int(2), false));
    assert_eq!(done_flags(&t), vec![false, false, true, true, true]);
}

#[test]
fn n_points_take_n_plus_one_ticks() {
    let (program, _) = load(
        "
fn five(c: &Coroutine<int, int>) {
    c.begin();
    c.yield(10);
    c.yield(20);
    c.yield_none();
    c.yield(40);
    c.yield(50);
}
",
    );
    let t = ticks(&program, "five", Value::Unit, 6);
    assert_eq!(done_flags(&t), vec![false, false, false, false, false, true]);
    // yield_none leaves the previous output in place.
    let outs: Vec<Value> = t[..5].iter().map(|(v, _)| v.clone()).collect();
    assert_eq!(
        outs,
        vec![Value::Int(10), Value::Int(20), Value::Int(20), Value::Int(40), Value::Int(50)]
    );
}

#[test]
fn statements_between_points_run_once_per_segment() {
    let (program, printed) = load(
        r#"
fn chatty(c: &Coroutine<int, int>) {
    print("setup");
    c.begin();
    print("first");
    c.yield(1);
    print("second");
    c.yield(2);
    print("last");
}
"#,
    );
    let co = program.create_coroutine("chatty", Value::Unit).unwrap();
    co.tick().unwrap();
    assert_eq!(*printed.borrow(), vec!["setup", "first"]);
    co.tick().unwrap();
    assert_eq!(*printed.borrow(), vec!["setup", "first", "setup", "second"]);
    assert!(co.tick().unwrap().done);
    assert_eq!(printed.borrow().last().map(String::as_str), Some("last"));
    // A finished coroutine runs nothing.
    let before = printed.borrow().len();
    co.tick().unwrap();
    assert_eq!(printed.borrow().len(), before);
}

#[test]
fn locals_survive_across_ticks() {
    let (program, _) = load(
        "
fn acc(c: &Coroutine<int, int>) {
    c.begin();
    let total = c.input;
    c.yield(total);
    total = total * 2;
    c.yield(total);
    total = total + 1;
    c.yield(total);
}
",
    );
    let t = ticks(&program, "acc", Value::Int(5), 4);
    assert_eq!(t[0].0, Value::Int(5));
    assert_eq!(t[1].0, Value::Int(10));
    assert_eq!(t[2].0, Value::Int(11));
    assert!(t[3].1);
}

#[test]
fn early_return_finishes_the_coroutine() {
    let (program, _) = load(
        "
fn short(c: &Coroutine<int, int>) {
    c.begin();
    c.yield(1);
    if c.input > 0 {
        return;
    }
    c.yield(2);
}
",
    );
    let t = ticks(&program, "short", Value::Int(1), 3);
    assert_eq!(done_flags(&t), vec![false, true, true]);
    let t = ticks(&program, "short", Value::Int(0), 3);
    assert_eq!(done_flags(&t), vec![false, false, true]);
}

#[test]
fn out_of_range_state_falls_to_done() {
    let (program, printed) = load(
        r#"
fn noisy(c: &Coroutine<int, int>) {
    c.begin();
    print("a");
    c.yield(1);
    print("b");
    c.yield(2);
}
"#,
    );
    let co = program.create_coroutine("noisy", Value::Unit).unwrap();
    co.with_regs(|r| r.state = 42);
    assert!(co.tick().unwrap().done);
    assert!(co.tick().unwrap().done);
    assert!(printed.borrow().is_empty());
}
