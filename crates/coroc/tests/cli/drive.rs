#[path = "../common/mod.rs"]
mod common;

use common::{COUNTER, coroc, write_source};
use predicates::prelude::*;

#[test]
fn prints_each_tick() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);
    coroc()
        .arg("drive")
        .arg(&src)
        .args(["counter", "--input", "2"])
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("tick #1: out=0 done=false\ntick #2: out=1 done=false\ntick #3: ")
                .and(predicate::str::ends_with("done=true\n")),
        );
}

#[test]
fn max_ticks_bounds_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);
    coroc()
        .arg("drive")
        .arg(&src)
        .args(["counter", "--input", "100", "--max-ticks", "2"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("tick #2:"))
        .stderr(predicate::str::contains("did not finish within 2 ticks"));
}

#[test]
fn max_ticks_from_the_environment() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);
    coroc()
        .env("COROC_MAX_TICKS", "4")
        .arg("drive")
        .arg(&src)
        .args(["counter", "--input", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not finish within 4 ticks"));
}

#[test]
fn unknown_coroutine() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);
    coroc()
        .arg("drive")
        .arg(&src)
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot create coroutine `nope`"));
}

#[test]
fn verbose_logs_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_source(dir.path(), "counter.coro", COUNTER);
    coroc()
        .arg("--verbose")
        .arg("drive")
        .arg(&src)
        .args(["counter", "--input", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("lowering coroutine"));
}
