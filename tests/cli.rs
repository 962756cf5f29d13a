use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample_countries.csv")
}

fn cdx() -> Command {
    let mut cmd = Command::cargo_bin("cdx").unwrap();
    cmd.arg("--data").arg(fixture());
    cmd
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("cdx").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("cdx"))
        .stdout(predicate::str::contains("compare"));
}

#[test]
fn missing_dataset_fails_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("cdx").unwrap();
    cmd.arg("--data").arg(dir.path().join("absent.csv")).arg("countries");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("data file not found"));
}

#[test]
fn countries_lists_fixture() {
    cdx()
        .arg("countries")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coldland\t5"))
        .stdout(predicate::str::contains("Testland\t21"))
        .stderr(predicate::str::contains("3 countries"));
}

#[test]
fn show_prints_story_and_decades() {
    cdx()
        .args(["show", "--country", "Testland", "--window", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Climate Summary: Testland"))
        .stdout(predicate::str::contains("The hottest year was 1919"))
        .stdout(predicate::str::contains("(warming)"))
        .stdout(predicate::str::contains("1910\t1.450"));
}

#[test]
fn show_outside_data_warns_and_succeeds() {
    cdx()
        .args(["show", "--country", "Coldland", "--years", "1900:1905"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no data available for Coldland"));
}

#[test]
fn show_range_before_dataset_warns_instead_of_reporting() {
    cdx()
        .args(["show", "--country", "Testland", "--years", "1700:1750"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Climate Summary").not())
        .stderr(predicate::str::contains("no data available for Testland"))
        .stderr(predicate::str::contains("1700-1750"));
}

#[test]
fn show_writes_png_charts() {
    let dir = tempfile::tempdir().unwrap();
    cdx()
        .args(["show", "--country", "Testland"])
        .arg("--plot")
        .arg(dir.path().join("ts.png"))
        .arg("--stripes")
        .arg(dir.path().join("stripes.png"))
        .arg("--decade-plot")
        .arg(dir.path().join("decades.png"))
        .assert()
        .success();
    for name in ["ts.png", "stripes.png", "decades.png"] {
        let bytes = std::fs::read(dir.path().join(name)).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }
}

#[test]
fn show_json_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let out = cdx()
        .args(["show", "--country", "Testland", "--json", "--no-trend"])
        .arg("--export-dir")
        .arg(dir.path())
        .arg("--plot")
        .arg(dir.path().join("ts.svg"))
        .output()
        .unwrap();
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["annual"].as_array().unwrap().len(), 20);
    assert!(v["trend"].is_null());
    assert_eq!(v["metrics"]["hottest"]["year"], 1919);

    assert!(dir.path().join("Testland_annual_anomaly.csv").exists());
    assert!(dir.path().join("Testland_decade_anomaly.csv").exists());
    assert!(dir.path().join("ts.svg").exists());
}

#[test]
fn compare_writes_table() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("cmp.json");
    cdx()
        .args(["compare", "--countries", "Japan;Atlantis,Testland", "--years", "1900:1909"])
        .arg("--out")
        .arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Japan\t"))
        .stdout(predicate::str::contains("Atlantis").not());

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
}

#[test]
fn compare_with_empty_list_prompts() {
    cdx()
        .args(["compare", "--countries", " , "])
        .assert()
        .success()
        .stderr(predicate::str::contains("select at least one country"));
}
