use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    Command::cargo_bin("bfi").unwrap()
}

#[test]
fn unmatched_open_bracket_fails_with_no_output() {
    // The '.' before the bad jump already ran; its byte must not be printed.
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", ".["])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unmatched bracket"));
}

#[test]
fn unmatched_close_bracket_fails_with_caret_context() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", "+]"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("at instruction 1").and(predicate::str::contains("^")));
}

#[test]
fn step_limit_aborts_infinite_loop() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", "--max-steps", "10000", "+[]"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("step limit exceeded"));
}

#[test]
fn zero_tape_size_is_a_usage_error() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", "--tape-size", "0", "+"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("tape-size"));
}
