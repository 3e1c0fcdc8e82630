#[path = "../common/mod.rs"]
mod common;

use common::{COUNTER, coroc, write_source};
use predicates::prelude::*;

#[test]
fn writes_a_sibling_and_leaves_the_source_alone() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);

    coroc()
        .current_dir(dir.path())
        .arg("gen")
        .arg(&src)
        .assert()
        .success()
        .stderr(predicate::str::contains("wrote"));

    let generated = std::fs::read_to_string(dir.path().join("counter.gen.coro")).unwrap();
    assert!(generated.starts_with("// Code generated by coroc; DO NOT EDIT.\n"));
    assert!(generated.contains("fn counter_gen(c: &Coroutine<int, int>)"));
    assert_eq!(std::fs::read_to_string(&src).unwrap(), COUNTER);
}

#[test]
fn directories_skip_generated_files() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "counter.coro", COUNTER);
    coroc().current_dir(dir.path()).args(["gen", "."]).assert().success();
    let first = std::fs::read_to_string(dir.path().join("counter.gen.coro")).unwrap();

    // A second run must not lower counter.gen.coro into counter.gen.gen.coro.
    coroc().current_dir(dir.path()).args(["gen", "."]).assert().success();
    assert!(!dir.path().join("counter.gen.gen.coro").exists());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("counter.gen.coro")).unwrap(),
        first
    );
}

#[test]
fn check_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);
    coroc()
        .args(["gen", "--check"])
        .arg(&src)
        .assert()
        .success()
        .stderr(predicate::str::contains("1 coroutine(s) lower cleanly"));
    assert!(!dir.path().join("counter.gen.coro").exists());
}

#[test]
fn stdout_prints_the_generated_module() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);
    coroc()
        .args(["gen", "--stdout"])
        .arg(&src)
        .assert()
        .success()
        .stdout(predicate::str::contains("#![generated]").and(predicate::str::contains("switch c.state")));
}

#[test]
fn out_dir_and_suffix_flags() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);
    let out = dir.path().join("out");
    coroc()
        .args(["gen", "--suffix", "sm", "--out-dir"])
        .arg(&out)
        .arg(&src)
        .assert()
        .success();
    assert!(out.join("counter.sm.coro").exists());
}

#[test]
fn config_file_and_environment() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "counter.coro", COUNTER);
    write_source(dir.path(), "coroc.toml", "fn_suffix = \"_machine\"\nheader = \"// made by a test\"\n");

    coroc()
        .current_dir(dir.path())
        .env("COROC_SUFFIX", "lowered")
        .args(["gen", "counter.coro"])
        .assert()
        .success();
    let text = std::fs::read_to_string(dir.path().join("counter.lowered.coro")).unwrap();
    assert!(text.starts_with("// made by a test\n"));
    assert!(text.contains("fn counter_machine("));
}

#[test]
fn invalid_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "counter.coro", COUNTER);
    write_source(dir.path(), "bad.toml", "max_ticks = 0\n");
    coroc()
        .current_dir(dir.path())
        .args(["--config", "bad.toml", "gen", "counter.coro"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_ticks must be at least 1"));
}

#[test]
fn transform_errors_are_reported_with_locations() {
    let dir = tempfile::tempdir().unwrap();
    write_source(
        dir.path(),
        "broken.coro",
        "fn broken(c: &Coroutine<int, int>) {\n    c.begin();\n    c.begin();\n    c.yield(1);\n}\n",
    );
    coroc()
        .current_dir(dir.path())
        .args(["gen", "broken.coro"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("error: begin() appears more than once in `broken`")
                .and(predicate::str::contains("--> broken.coro:3:5"))
                .and(predicate::str::contains("1 of 1 file(s) failed")),
        );
    assert!(!dir.path().join("broken.gen.coro").exists());
}

#[test]
fn parse_errors_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "syntax.coro", "fn main() {\n    let x = (1;\n}\n");
    coroc()
        .current_dir(dir.path())
        .args(["gen", "syntax.coro"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--> syntax.coro:"));
}
