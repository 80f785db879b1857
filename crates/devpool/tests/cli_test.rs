#![allow(deprecated)]

mod common;

use assert_cmd::Command;
use common::{SESSION, TestEnv};
use predicates::prelude::*;
use serial_test::serial;

#[test]
#[serial]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("devpool").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("find"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("claim"))
        .stdout(predicate::str::contains("release"));
}

#[test]
#[serial]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("devpool").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("devpool"));
}

#[test]
#[serial]
fn test_name_belongs_to_session() {
    let env = TestEnv::new();
    env.write_config("gmsaas");

    env.cmd()
        .arg("name")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("Detox.{}.", SESSION)));
}

#[test]
#[serial]
fn test_missing_gmsaas_is_a_failure_not_a_miss() {
    let env = TestEnv::new();
    env.write_config("/nonexistent/bin/gmsaas");

    env.cmd()
        .args(["find", "r-pixel"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("gmsaas not found"));
}

#[test]
#[serial]
fn test_empty_recipe_is_rejected() {
    let env = TestEnv::new();
    env.write_config("/nonexistent/bin/gmsaas");

    env.cmd()
        .args(["find", ""])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("recipe id must not be empty"));
}

#[test]
#[serial]
fn test_busy_empty_registry() {
    let env = TestEnv::new();
    env.write_config("gmsaas");

    env.cmd()
        .arg("busy")
        .assert()
        .success()
        .stdout(predicate::str::contains("No busy devices"));
}

#[test]
#[serial]
fn test_invalid_config_file() {
    let env = TestEnv::new();
    std::fs::write(env.config_path(), "claim_attempts: 0\n").unwrap();

    env.cmd()
        .arg("busy")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("claim_attempts"));
}

#[cfg(unix)]
const INSTANCES: &str = r#"{"instances":[
{"uuid":"i-1","name":"Detox.s1.100","state":"ONLINE","adb_serial":"localhost:35001","recipe":{"uuid":"r-pixel","name":"Pixel"}},
{"uuid":"i-2","name":"Detox.s1.200","state":"ONLINE","adb_serial":"localhost:35002","recipe":{"uuid":"r-pixel","name":"Pixel"}},
{"uuid":"i-3","name":"Detox.other.1","state":"ONLINE","adb_serial":"localhost:35003","recipe":{"uuid":"r-pixel","name":"Pixel"}},
{"uuid":"i-4","name":"Detox.s1.300","state":"RECYCLED","adb_serial":"0.0.0.0","recipe":{"uuid":"r-pixel","name":"Pixel"}}
]}"#;

#[cfg(unix)]
#[test]
#[serial]
fn test_find_claim_release_flow() {
    let env = TestEnv::new();
    let gmsaas = env.write_fake_gmsaas(INSTANCES);
    env.write_config(&gmsaas);

    env.cmd()
        .args(["find", "r-pixel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("i-1"));

    // find does not claim
    env.cmd()
        .args(["find", "r-pixel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("i-1"));

    env.cmd()
        .args(["claim", "r-pixel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("i-1"));

    env.cmd()
        .args(["find", "r-pixel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("i-2"));

    env.cmd()
        .args(["claim", "r-pixel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("i-2"));

    env.cmd()
        .args(["claim", "r-pixel"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No free instance"));

    env.cmd()
        .args(["busy", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"i-1\""))
        .stdout(predicate::str::contains("\"i-2\""));

    env.cmd()
        .args(["release", "i-1"])
        .assert()
        .success();

    env.cmd()
        .args(["release", "i-1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Not claimed"));

    env.cmd()
        .args(["find", "r-pixel", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"i-1\""));
}

#[cfg(unix)]
#[test]
#[serial]
fn test_get_ignores_availability() {
    let env = TestEnv::new();
    let gmsaas = env.write_fake_gmsaas(INSTANCES);
    env.write_config(&gmsaas);

    env.cmd()
        .args(["get", "i-3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Detox.other.1"));

    env.cmd()
        .args(["get", "i-4", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RECYCLED"));

    env.cmd()
        .args(["get", "nope"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Instance not found"));

    env.cmd()
        .args(["find", "r-other"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No free instance"));
}
