//! CLI end-to-end tests: init, validate, and compile against a temporary
//! directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lzforge() -> Command {
    Command::cargo_bin("lzforge").unwrap()
}

#[test]
fn init_then_validate_passes() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lzforge.json");
    lzforge()
        .arg("init")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote starter configuration"));
    lzforge()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn compile_writes_the_full_file_tree() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lzforge.json");
    let out = dir.path().join("out");
    lzforge().arg("init").arg(&config).assert().success();
    lzforge()
        .arg("compile")
        .arg(&config)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Compiled"));

    for file in [
        "main.tf",
        "resource_groups.tf",
        "versions.tf",
        "variables.tf",
        "virtual_servers.tf",
        "lzforge.json",
        "management_vpc/main.tf",
        "management_vpc/outputs.tf",
        "workload_vpc/acl_workload_workload.tf",
    ] {
        assert!(out.join(file).exists(), "{file} missing");
    }
    // Empty families leave no file behind.
    assert!(!out.join("load_balancers.tf").exists());
    assert!(!out.join("event_streams.tf").exists());

    let main = std::fs::read_to_string(out.join("main.tf")).unwrap();
    assert!(main.contains("provider \"ibm\" {"));
    assert!(main.contains("module \"workload_vpc\" {"));
}

#[test]
fn compile_is_deterministic_across_runs() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lzforge.json");
    lzforge().arg("init").arg(&config).assert().success();
    let out_a = dir.path().join("a");
    let out_b = dir.path().join("b");
    for out in [&out_a, &out_b] {
        lzforge()
            .arg("compile")
            .arg(&config)
            .arg("-o")
            .arg(out)
            .assert()
            .success();
    }
    let text_a = std::fs::read_to_string(out_a.join("key_management.tf")).unwrap();
    let text_b = std::fs::read_to_string(out_b.join("key_management.tf")).unwrap();
    assert_eq!(text_a, text_b);
}

#[test]
fn dry_run_prints_names_without_writing() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lzforge.json");
    let out = dir.path().join("out");
    lzforge().arg("init").arg(&config).assert().success();
    lzforge()
        .arg("compile")
        .arg(&config)
        .arg("-o")
        .arg(&out)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("resource_groups.tf"))
        .stdout(predicate::str::contains("management_vpc/main.tf"));
    assert!(!out.exists());
}

#[test]
fn validate_reports_failing_forms_and_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("lzforge.json");
    lzforge().arg("init").arg(&config).assert().success();
    // Break the cluster by dropping its flavor.
    let mut document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    document["clusters"][0]["flavor"] = serde_json::Value::Null;
    std::fs::write(&config, serde_json::to_string_pretty(&document).unwrap()).unwrap();

    lzforge()
        .arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("invalid: clusters"));
}

#[test]
fn missing_config_is_a_friendly_error() {
    lzforge()
        .arg("compile")
        .arg("/definitely/not/here.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}
