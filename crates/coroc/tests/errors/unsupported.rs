#[path = "../common/mod.rs"]
mod common;

use common::transform_errors;
use coroc::transform::TransformError;

#[test]
fn suspension_inside_switch() {
    let errs = transform_errors(
        "
fn sw(c: &Coroutine<int, int>) {
    c.begin();
    switch c.input {
        case 1 {
            c.yield(1);
        }
        default {
            c.yield(2);
        }
    }
}
",
    );
    assert_eq!(errs.len(), 2);
    for e in &errs {
        assert!(matches!(e, TransformError::UnsupportedConstruct { construct: "switch", .. }));
        assert!(e.to_string().contains("`switch`"));
    }
}

#[test]
fn suspension_inside_labelled_loop() {
    let errs = transform_errors(
        "
fn lp(c: &Coroutine<int, int>) {
    c.begin();
    loop 'outer {
        c.yield(1);
        break 'outer;
    }
}
",
    );
    assert!(matches!(
        &errs[..],
        [TransformError::UnsupportedConstruct { construct: "loop", .. }]
    ));
    assert!(errs[0].note().unwrap().contains("`for` or `while`"));
}

#[test]
fn switch_without_suspension_is_fine() {
    let errs = transform_errors(
        "
fn sw(c: &Coroutine<int, int>) {
    c.begin();
    switch c.input {
        case 1 { print(1); }
    }
}
",
    );
    // Only the missing suspension point is reported.
    assert!(matches!(&errs[..], [TransformError::BeginWithoutSuspension { .. }]));
}

#[test]
fn two_points_in_one_loop() {
    let errs = transform_errors(
        "
fn twice(c: &Coroutine<int, int>) {
    c.begin();
    while true {
        c.yield(1);
        if c.input > 0 {
            c.yield(2);
        }
    }
}
",
    );
    assert!(matches!(
        &errs[..],
        [TransformError::MultipleSuspensionsInLoop { count: 2, .. }]
    ));
}

#[test]
fn marker_in_loop_header() {
    let errs = transform_errors(
        "
fn header(c: &Coroutine<int, int>) {
    c.begin();
    for let i = 0; i < 3; c.yield(i) {
        print(i);
    }
    c.yield(0);
}
",
    );
    assert!(matches!(
        &errs[..],
        [TransformError::MarkerInExpression { marker, .. }] if marker == "yield"
    ));
}
