#[path = "../common/mod.rs"]
mod common;

use common::{lower, parse};
use coro_ast::print::print_module;
use coro_runtime::Value;
use coroc::interp::{Output, Program};
use coroc::transform::{TransformOptions, transform_module};

const SRC: &str = r#"
fn walker(c: &Coroutine<int, int>) {
    let step = 2;
    c.begin();
    for let i = 0; i < c.input; i = i + step {
        if i > 2 {
            c.yield(i);
        }
    }
    c.yield_to(countdown(2));
    c.yield(-1);
}

fn main() {
    print("hi");
}
"#;

#[test]
fn lowering_generated_output_changes_nothing() {
    let once = print_module(&lower(SRC));
    let mut again = parse(&once);
    let report = transform_module(&mut again, &TransformOptions::default()).unwrap();
    assert_eq!(report.lowered, vec!["walker".to_string()]);
    assert_eq!(print_module(&again), once);
}

#[test]
fn a_second_pass_in_memory_is_stable() {
    let mut module = lower(SRC);
    let first = print_module(&module);
    transform_module(&mut module, &TransformOptions::default()).unwrap();
    assert_eq!(print_module(&module), first);
}

#[test]
fn reparsed_output_behaves_like_the_in_memory_module() {
    let outputs = |program: std::rc::Rc<Program>| {
        let co = program.create_coroutine("walker", Value::Int(8)).unwrap();
        let mut seen = Vec::new();
        loop {
            let t = co.tick().unwrap();
            seen.push((t.output, t.done));
            if t.done {
                break seen;
            }
        }
    };
    let module = lower(SRC);
    let reparsed = parse(&print_module(&module));
    let a = outputs(Program::load(&module, Output::capture().0));
    let b = outputs(Program::load(&reparsed, Output::capture().0));
    assert_eq!(a, b);
    let yielded: Vec<Value> = a.iter().take(3).map(|(v, _)| v.clone()).collect();
    assert_eq!(yielded, vec![Value::Int(4), Value::Int(6), Value::Int(6)]);
}

#[test]
fn original_body_is_kept_behind_the_guard() {
    let module = lower(SRC);
    let walker = module.function("walker").unwrap();
    let printed = print_module(&module);
    assert!(printed.starts_with("#![generated]\n"));
    assert!(printed.contains("if HAS_GEN {\n        walker_gen(c);\n        return;\n    }"));
    // Markers survive in the original so it can be lowered again.
    assert!(coro_ast::print::print_fn(walker).contains("c.yield_to(countdown(2));"));
    assert!(module.function("walker_gen").is_some());
}

#[test]
fn without_has_gen_the_original_hits_a_marker() {
    let mut module = lower(SRC);
    module.generated = false;
    let program = Program::load(&module, Output::capture().0);
    let co = program.create_coroutine("walker", Value::Int(8)).unwrap();
    let err = co.tick().unwrap_err();
    assert!(err.to_string().contains("`begin` reached at run time"));
}
