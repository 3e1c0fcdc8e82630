#[path = "../common/mod.rs"]
mod common;

use std::path::PathBuf;

use common::coroc;
use predicates::prelude::*;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

#[test]
fn demo_runs_to_completion() {
    coroc()
        .arg("run")
        .arg(demo("demo.coro"))
        .assert()
        .success()
        .stdout(
            predicate::str::contains("outer yield: 1\nticks done: 1 output: 1\n")
                .and(predicate::str::contains("inner before yield_none\n"))
                .and(predicate::str::contains("inner after yield_none\nouter yield: 2\n"))
                .and(predicate::str::contains("finished after")),
        );
}

#[test]
fn fizzbuzz_drives_fifteen_ticks() {
    coroc()
        .arg("drive")
        .arg(demo("fizzbuzz.coro"))
        .args(["fizz", "--input", "15"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("fizz\ntick #3: out=3 done=false\n")
                .and(predicate::str::contains("fizzbuzz\ntick #15: out=15 done=false\n"))
                .and(predicate::str::contains("tick #16:")),
        );
}
