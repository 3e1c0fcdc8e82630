#[path = "../common/mod.rs"]
mod common;

use common::{COUNTER, coroc, write_source};
use predicates::prelude::*;

#[test]
fn runs_main_after_lowering_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);
    coroc()
        .arg("run")
        .arg(&src)
        .assert()
        .success()
        .stdout("got 0\ngot 1\ngot 2\nfinished\n");
    assert!(!dir.path().join("counter.gen.coro").exists());
}

#[test]
fn runs_generated_files_directly() {
    let dir = tempfile::tempdir().unwrap();
    write_source(dir.path(), "counter.coro", COUNTER);
    coroc().current_dir(dir.path()).args(["gen", "counter.coro"]).assert().success();
    coroc()
        .current_dir(dir.path())
        .args(["run", "counter.gen.coro"])
        .assert()
        .success()
        .stdout("got 0\ngot 1\ngot 2\nfinished\n");
}

#[test]
fn custom_entry_point() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "entry.coro", "fn start() { print(\"from start\"); }\n");
    coroc()
        .args(["run", "--entry", "start"])
        .arg(&src)
        .assert()
        .success()
        .stdout("from start\n");
}

#[test]
fn runtime_failures_exit_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "boom.coro", "fn main() { print(1 / 0); }\n");
    coroc()
        .arg("run")
        .arg(&src)
        .assert()
        .failure()
        .stderr(predicate::str::contains("`main` failed: division by zero"));
}

#[test]
fn missing_entry_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "empty.coro", "fn helper() {}\n");
    coroc()
        .arg("run")
        .arg(&src)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown function `main`"));
}
