use assert_cmd::Command;
use predicates::prelude::*;

fn relay() -> Command {
    let mut cmd = Command::cargo_bin("relay").unwrap();
    // Point both endpoints at a port nothing listens on so network-touching
    // commands fail fast and deterministically.
    cmd.env("RELAY_STORE_URL", "http://127.0.0.1:9/kb")
        .env("RELAY_FUNCTIONS_URL", "http://127.0.0.1:9/fn");
    cmd
}

#[test]
fn help_lists_subcommands() {
    relay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("catalog"))
        .stdout(predicate::str::contains("invoke"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn invoke_requires_action_flag() {
    relay()
        .arg("invoke")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--action"));
}

#[test]
fn resolve_requires_groups_flag() {
    relay()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--groups"));
}

#[test]
fn catalog_reports_unreachable_store() {
    relay()
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_params_json_is_rejected_before_dispatch() {
    relay()
        .args(["invoke", "--action", "summarize-docs", "--params", "not-json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--params must be a JSON object"));
}
