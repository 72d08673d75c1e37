use predicates::str::{contains, diff};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

fn write_temp_file(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be available")
        .as_nanos();
    path.push(format!("infrasizer-sub-{}.{}", nanos, extension));
    fs::write(&path, contents).expect("file write should succeed");
    path
}

#[test]
fn list_components_prints_keys() {
    let expected = concat!(
        "crm: CRM Solution\n",
        "marketing: Marketing Automation\n",
        "assistant: Conversational AI Layer\n",
        "analytics: OLAP Analytics\n",
        "visualization: BI Visualization\n",
        "messaging: Team Messaging\n",
    );
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("infrasizer");
    cmd.arg("list-components");
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn show_config_prints_defaults() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("infrasizer");
    cmd.arg("show-config");
    cmd.assert()
        .success()
        .stdout(contains("[env_multipliers]"))
        .stdout(contains("prod = 1.5"))
        .stdout(contains("ha_uat_user_threshold = 100"));
}

#[test]
fn show_config_merges_partial_table() {
    let path = write_temp_file("[env_multipliers]\nprod = 2.0\n", "toml");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("infrasizer");
    cmd.args(["show-config", "--table", path.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(contains("prod = 2.0"))
        .stdout(contains("dev = 0.8"));
}

#[test]
fn malformed_table_falls_back_with_warning() {
    let path = write_temp_file("{ not json", "json");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("infrasizer");
    cmd.args(["show-config", "--table", path.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(contains("prod = 1.5"))
        .stderr(contains("ignoring malformed JSON tuning table"));
}

#[test]
fn platform_prints_default_matrix() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("infrasizer");
    cmd.arg("platform");
    cmd.assert()
        .success()
        .stdout(contains("Software:\n"))
        .stdout(contains("PostgreSQL: 15.x / 16.x"))
        .stdout(contains("Browsers:\n"))
        .stdout(contains("Apple Safari: 17+\n"));
}

#[test]
fn platform_rejects_empty_dataset() {
    let path = write_temp_file(r#"{ "software": [], "browsers": [] }"#, "json");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("infrasizer");
    cmd.args(["platform", "--recommendations", path.to_str().unwrap()]);
    cmd.assert().failure().stderr(contains(
        "Error: invalid recommendations: no valid software or browser rows",
    ));
}

#[test]
fn platform_uses_custom_dataset() {
    let path = write_temp_file(
        r#"{
            "software": [ { "software": "Nginx", "supportedVersion": "1.26" } ],
            "browsers": [ { "browser": "Chrome", "supportedVersion": "130+" } ]
        }"#,
        "json",
    );
    let expected = concat!(
        "Software:\n",
        "Nginx: 1.26\n",
        "Browsers:\n",
        "Chrome: 130+\n",
    );
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("infrasizer");
    cmd.args(["platform", "--recommendations", path.to_str().unwrap()]);
    cmd.assert().success().stdout(diff(expected));
}
