#[path = "../common/mod.rs"]
mod common;

use common::{parse, transform_errors};
use coroc::diagnostics::{Diagnostic, line_col, render};
use coroc::transform::{TransformError, TransformOptions, transform_module};

fn plain_render(d: &Diagnostic, src: &str) -> String {
    colored::control::set_override(false);
    render(d, Some(src))
}

#[test]
fn begin_without_a_suspension_point() {
    let errs = transform_errors("fn idle(c: &Coroutine<int, int>) {\n    c.begin();\n}\n");
    assert!(matches!(
        &errs[..],
        [TransformError::BeginWithoutSuspension { function, .. }] if function == "idle"
    ));
}

#[test]
fn suspension_without_begin() {
    let errs = transform_errors("fn eager(c: &Coroutine<int, int>) {\n    c.yield(1);\n}\n");
    assert!(matches!(&errs[..], [TransformError::SuspensionWithoutBegin { .. }]));
    assert!(errs[0].note().is_some());
}

#[test]
fn duplicate_begin_points_at_the_second_call() {
    let src = "fn twice(c: &Coroutine<int, int>) {\n    c.begin();\n    c.yield(1);\n    c.begin();\n}\n";
    let errs = transform_errors(src);
    assert!(matches!(&errs[..], [TransformError::DuplicateBegin { .. }]));
    assert_eq!(line_col(src, errs[0].span().start), (4, 5));

    let text = plain_render(&Diagnostic::from(&errs[0]).in_file("src/twice.coro"), src);
    assert!(text.starts_with("error: begin() appears more than once in `twice`\n"));
    assert!(text.contains("--> twice.coro:4:5"));
    assert!(text.contains("^^^^^^^^^"));
}

#[test]
fn begin_inside_a_block() {
    let errs = transform_errors(
        "fn hidden(c: &Coroutine<int, int>) {\n    if true {\n        c.begin();\n    }\n    c.yield(1);\n}\n",
    );
    assert!(errs.iter().any(|e| matches!(e, TransformError::NestedBegin { .. })));
}

#[test]
fn markers_inside_expressions() {
    let errs = transform_errors(
        "fn used(c: &Coroutine<int, int>) {\n    c.begin();\n    let x = c.yield(1);\n    print(c.yield_none());\n    c.yield(x);\n}\n",
    );
    let markers: Vec<&str> = errs
        .iter()
        .filter_map(|e| match e {
            TransformError::MarkerInExpression { marker, .. } => Some(marker.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(markers, vec!["yield", "yield_none"]);
}

#[test]
fn marker_arity() {
    let errs = transform_errors(
        "fn args(c: &Coroutine<int, int>) {\n    c.begin(1);\n    c.yield(1, 2);\n    c.yield_to();\n    c.yield_none(3);\n}\n",
    );
    let arities: Vec<(&str, &str)> = errs
        .iter()
        .filter_map(|e| match e {
            TransformError::BadMarkerArity {
                marker, expected, ..
            } => Some((marker.as_str(), *expected)),
            _ => None,
        })
        .collect();
    assert_eq!(
        arities,
        vec![
            ("begin", "takes no arguments"),
            ("yield", "takes at most one argument"),
            ("yield_to", "takes exactly one argument"),
            ("yield_none", "takes no arguments"),
        ]
    );
}

#[test]
fn value_returns_and_shadowing() {
    let errs = transform_errors(
        "fn bad(c: &Coroutine<int, int>) {\n    c.begin();\n    c.yield(1);\n    let c = 3;\n    return 2;\n}\n",
    );
    assert!(errs.iter().any(|e| matches!(e, TransformError::ShadowedHandle { handle, .. } if handle == "c")));
    assert!(errs.iter().any(|e| matches!(e, TransformError::ValueReturn { .. })));
}

#[test]
fn every_broken_function_is_reported() {
    let src = "
fn one(c: &Coroutine<int, int>) { c.begin(); }
fn ok(c: &Coroutine<int, int>) { c.begin(); c.yield(1); }
fn two(c: &Coroutine<int, int>) { c.yield(1); }
";
    let mut module = parse(src);
    let errs = transform_module(&mut module, &TransformOptions::default()).unwrap_err();
    let functions: Vec<&str> = errs.iter().map(|e| e.function()).collect();
    assert_eq!(functions, vec!["one", "two"]);
    // Nothing was rewritten, not even the valid coroutine.
    assert!(module.function("ok_gen").is_none());
    assert!(!module.generated);
}

#[test]
fn non_coroutines_are_ignored() {
    let mut module = parse("fn helper(x: int) -> int { return x + 1; }\nfn other(c: &Thing) { c.yield(1); }\n");
    let report = transform_module(&mut module, &TransformOptions::default()).unwrap();
    assert!(report.lowered.is_empty());
    assert_eq!(module.items.len(), 2);
}
