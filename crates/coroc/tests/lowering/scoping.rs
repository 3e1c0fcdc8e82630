#[path = "../common/mod.rs"]
mod common;

use common::{done_flags, load, ticks};
use coro_runtime::Value;

#[test]
fn inner_let_does_not_clobber_the_outer_binding() {
    let (program, printed) = load(
        r#"
fn shadow(c: &Coroutine<int, int>) {
    c.begin();
    let x = 1;
    {
        let x = 2;
        print("inner", x);
    }
    print("outer", x);
    c.yield(x);
}
"#,
    );
    let t = ticks(&program, "shadow", Value::Unit, 2);
    assert_eq!(t[0], (Value::Int(1), false));
    assert!(t[1].1);
    assert_eq!(*printed.borrow(), vec!["inner 2", "outer 1"]);
}

#[test]
fn shadowed_binding_survives_a_suspension() {
    let (program, printed) = load(
        r#"
fn keep(c: &Coroutine<int, int>) {
    c.begin();
    let x = 1;
    if true {
        let x = 10;
        c.yield(x);
        print("resumed", x);
    }
    c.yield(x);
}
"#,
    );
    let t = ticks(&program, "keep", Value::Unit, 3);
    assert_eq!(t[0], (Value::Int(10), false));
    assert_eq!(t[1], (Value::Int(1), false));
    assert!(t[2].1);
    assert_eq!(*printed.borrow(), vec!["resumed 10"]);
}

#[test]
fn prelude_local_shadowed_inside_the_body() {
    let (program, _) = load(
        "
fn spread(c: &Coroutine<int, int>) {
    let n = 2;
    c.begin();
    for let i = 0; i < n; i = i + 1 {
        let n = 7;
        c.yield(i + n);
    }
}
",
    );
    let t = ticks(&program, "spread", Value::Unit, 3);
    assert_eq!(t[0], (Value::Int(7), false));
    assert_eq!(t[1], (Value::Int(8), false));
    assert_eq!(done_flags(&t), vec![false, false, true]);
}

#[test]
fn redeclaring_in_the_same_block_reads_the_old_value() {
    let (program, _) = load(
        "
fn bump(c: &Coroutine<int, int>) {
    c.begin();
    let x = c.input;
    let x = x + 1;
    c.yield(x);
}
",
    );
    let t = ticks(&program, "bump", Value::Int(4), 2);
    assert_eq!(t[0], (Value::Int(5), false));
    assert!(t[1].1);
}
