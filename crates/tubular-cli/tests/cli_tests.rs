use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
        .canonicalize()
        .expect("fixture present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("tubular-cli");
    cmd.env_remove("TUBULAR_MATERIALS").env("RUST_LOG", "error");
    cmd
}

#[test]
fn evaluates_fixture_member_as_text() {
    cli()
        .arg("--materials")
        .arg(fixture("materials.csv"))
        .arg("evaluate")
        .arg(fixture("monopile.json"))
        .assert()
        .success()
        .stdout(contains("Member monopile"))
        .stdout(contains("Total mass"))
        .stdout(contains("Ballast 1: variable"));
}

#[test]
fn evaluates_fixture_member_as_json() {
    let output = cli()
        .arg("evaluate")
        .arg(fixture("monopile.json"))
        .args(["--format", "json", "--refine", "4"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("stdout is json");
    assert_eq!(value["name"], "monopile");
    assert!(value["section_count"].as_u64().is_some_and(|n| n > 12));
    assert!(value["mass"]["total_mass"].as_f64().is_some_and(|m| m > 0.0));
}

#[test]
fn materials_come_from_environment() {
    let temp = tempdir().expect("create temp dir");
    let member = temp.path().join("member.json");
    fs::copy(fixture("monopile.json"), &member).expect("copy member");

    cli()
        .env("TUBULAR_MATERIALS", fixture("materials.csv"))
        .arg("evaluate")
        .arg(&member)
        .assert()
        .success()
        .stdout(contains("Member monopile"));
}

#[test]
fn ring_moved_off_bulkhead_is_a_warning() {
    cli()
        .env("RUST_LOG", "warn")
        .arg("--materials")
        .arg(fixture("materials.csv"))
        .arg("evaluate")
        .arg(fixture("monopile.json"))
        .assert()
        .success()
        .stderr(contains("ring stiffener moved off a bulkhead"));
}

#[test]
fn missing_material_table_is_an_error() {
    let temp = tempdir().expect("create temp dir");
    let member = temp.path().join("member.json");
    fs::copy(fixture("monopile.json"), &member).expect("copy member");

    cli()
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("evaluate")
        .arg(&member)
        .assert()
        .failure()
        .stderr(contains("TUBULAR_MATERIALS"));
}

#[test]
fn invalid_geometry_is_reported() {
    let temp = tempdir().expect("create temp dir");
    let member = temp.path().join("flat.json");
    fs::write(
        &member,
        r#"{
            "joint1": [0.0, 0.0, 0.0],
            "joint2": [0.0, 0.0, 10.0],
            "grid": [0.0, 0.5, 0.5, 1.0],
            "outer": {"shape": "circular", "diameter": [5.0, 5.0, 5.0, 5.0]},
            "layers": [{"material": "steel", "thickness": [0.05, 0.05, 0.05, 0.05]}]
        }"#,
    )
    .expect("write member");

    cli()
        .arg("--materials")
        .arg(fixture("materials.csv"))
        .arg("evaluate")
        .arg(&member)
        .assert()
        .failure()
        .stderr(contains("failed to evaluate member"))
        .stderr(contains("invalid geometry"));
}

#[test]
fn report_can_be_written_to_file() {
    let temp = tempdir().expect("create temp dir");
    let report = temp.path().join("report.txt");

    cli()
        .arg("evaluate")
        .arg(fixture("monopile.json"))
        .arg("--output")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(&report).expect("report written");
    assert!(text.contains("Total cost"));
}

#[test]
fn lists_materials() {
    cli()
        .arg("--materials")
        .arg(fixture("materials.csv"))
        .arg("materials")
        .assert()
        .success()
        .stdout(contains("name"))
        .stdout(contains("grout"))
        .stdout(contains("steel_outfitted"));
}

#[test]
fn lists_materials_as_json() {
    let output = cli()
        .env("TUBULAR_MATERIALS", fixture("materials.csv"))
        .args(["materials", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let rows: serde_json::Value = serde_json::from_slice(&output).expect("stdout is json");
    let rows = rows.as_array().expect("array of materials");
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["name"], "concrete");
}
