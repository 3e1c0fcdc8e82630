#[path = "../common/mod.rs"]
mod common;

use common::{done_flags, load, run_main, ticks};
use coro_runtime::Value;

#[test]
fn countdown_holds_the_coroutine_until_it_expires() {
    let (program, printed) = load(
        r#"
fn waiter(c: &Coroutine<int, int>) {
    c.begin();
    print("a");
    c.yield_to(countdown(3));
    print("b");
    c.yield(7);
}
"#,
    );
    let co = program.create_coroutine("waiter", Value::Unit).unwrap();
    let mut seen = Vec::new();
    for _ in 0..4 {
        let t = co.tick().unwrap();
        seen.push((printed.borrow().len(), t.done));
    }
    // The delegate is ticked once on install, then once per outer tick; the
    // next piece runs in the tick where it reports done.
    assert_eq!(seen, vec![(1, false), (1, false), (2, false), (2, true)]);
    assert_eq!(co.output(), Value::Int(7));
}

#[test]
fn child_coroutine_is_driven_to_completion() {
    let (program, printed) = load(
        r#"
fn child(c: &Coroutine<int, int>) {
    c.begin();
    c.yield(1);
    c.yield(2);
}

fn parent(c: &Coroutine<int, int>) {
    c.begin();
    let kid = new(child);
    c.yield_to(kid);
    print("kid", output(kid), done(kid));
    c.yield(99);
}
"#,
    );
    let t = ticks(&program, "parent", Value::Unit, 5);
    assert_eq!(done_flags(&t), vec![false, false, false, true, true]);
    assert_eq!(t[2].0, Value::Int(99));
    assert_eq!(*printed.borrow(), vec!["kid 2 true"]);
}

#[test]
fn delegate_done_on_install_resumes_on_the_next_tick() {
    let (program, printed) = load(
        r#"
fn quick(c: &Coroutine<int, int>) {
    c.begin();
    c.yield_to(countdown(1));
    print("resumed");
    c.yield(5);
}
"#,
    );
    let t = ticks(&program, "quick", Value::Unit, 3);
    assert_eq!(t[0].1, false);
    assert!(printed.borrow().is_empty());
    assert_eq!(t[1], (Value::Int(5), false));
    assert_eq!(*printed.borrow(), vec!["resumed"]);
    assert!(t[2].1);
}

#[test]
fn zero_length_sleep_finishes_on_its_install_tick() {
    let out = run_main(
        r#"
fn napper(c: &Coroutine<int, int>) {
    c.begin();
    c.yield_to(sleep(0));
    c.yield(1);
}

fn main() {
    let co = new(napper);
    let n = 0;
    while !tick(co) {
        n = n + 1;
    }
    print("ticks", n + 1, "out", output(co));
}
"#,
    );
    assert_eq!(out, vec!["ticks 3 out 1"]);
}
