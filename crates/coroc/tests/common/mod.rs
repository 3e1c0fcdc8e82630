#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use coro_ast::Module;
use coro_runtime::Value;
use coroc::interp::{Output, Program};
use coroc::transform::{TransformError, TransformOptions, transform_module};

pub fn parse(src: &str) -> Module {
    coro_parser::parse_module(src).expect("source should parse")
}

/// Parse and lower `src` with default options.
pub fn lower(src: &str) -> Module {
    let mut module = parse(src);
    transform_module(&mut module, &TransformOptions::default()).expect("source should lower");
    module
}

pub fn transform_errors(src: &str) -> Vec<TransformError> {
    let mut module = parse(src);
    transform_module(&mut module, &TransformOptions::default())
        .expect_err("source should be rejected")
}

/// Load the lowered module with a capturing `print`.
pub fn load(src: &str) -> (Rc<Program>, Rc<RefCell<Vec<String>>>) {
    let (output, buf) = Output::capture();
    (Program::load(&lower(src), output), buf)
}

/// Tick coroutine `name` `n` times, returning `(output, done)` per tick.
pub fn ticks(program: &Rc<Program>, name: &str, input: Value, n: usize) -> Vec<(Value, bool)> {
    let co = program.create_coroutine(name, input).expect("coroutine");
    (0..n)
        .map(|_| {
            let t = co.tick().expect("tick");
            (t.output, t.done)
        })
        .collect()
}

pub fn done_flags(ticks: &[(Value, bool)]) -> Vec<bool> {
    ticks.iter().map(|(_, done)| *done).collect()
}

/// Run `main` of the lowered module and return what it printed.
pub fn run_main(src: &str) -> Vec<String> {
    let (program, buf) = load(src);
    program.call_function("main", vec![]).expect("main should succeed");
    let lines = buf.borrow().clone();
    lines
}

/// Write `contents` to `name` inside `dir`.
pub fn write_source(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write source");
    path
}

/// The `coroc` binary with logging and colour pinned for stable output.
pub fn coroc() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("coroc").expect("coroc binary");
    cmd.env_remove("COROC_LOG")
        .env_remove("COROC_SUFFIX")
        .env_remove("COROC_FN_SUFFIX")
        .env_remove("COROC_MAX_TICKS")
        .arg("--color")
        .arg("never");
    cmd
}

pub const COUNTER: &str = "
fn counter(c: &Coroutine<int, int>) {
    c.begin();
    for let i = 0; i < c.input; i = i + 1 {
        c.yield(i);
    }
}

fn main() {
    let co = new(counter, 3);
    while !tick(co) {
        print(\"got\", output(co));
    }
    print(\"finished\");
}
";
