use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value as JsonValue;
use tempfile::TempDir;

const MAP: &str = r#"
basePath: /api/now
operations:
  Incident.Get:
    path: /table/incident/{sys_id}
    method: GET
    auth: Bearer
    description: Fetch one incident
  Incident.List:
    path: /table/incident
    method: GET
    query:
      sysparm_query: "{query}"
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("operations.yaml"), MAP).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn opmap(&self) -> Command {
        let mut cmd = Command::cargo_bin("opmap").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("OPMAP_TOKEN")
            .env_remove("OPMAP_SECRETS_DIR")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path("opmap.json"))
            .arg("--map")
            .arg(self.path("operations.yaml"));
        cmd
    }
}

fn stdout_json(out: &[u8]) -> JsonValue {
    serde_json::from_slice(out).unwrap()
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

#[test]
fn validate_accepts_the_configured_map() {
    let ws = Workspace::new();
    ws.opmap().arg("validate").assert().success();
}

#[test]
fn validate_reports_violations_with_exit_code_2() {
    let ws = Workspace::new();
    let bad = ws.path("bad.json");
    write(
        &bad,
        r#"{"basePath": "api", "operations": {"X": {"path": "", "method": "GET"}}}"#,
    );
    let out = ws
        .opmap()
        .args(["--format", "json", "validate"])
        .arg(&bad)
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let v = stdout_json(&out);
    assert_eq!(v["valid"], false);
    assert_eq!(v["errors"], serde_json::json!(["operations.X.path: must not be empty"]));
    assert_eq!(v["warnings"], serde_json::json!(["basePath: does not start with '/'"]));
}

#[test]
fn validate_passes_with_warnings_only() {
    let ws = Workspace::new();
    let odd = ws.path("odd.json");
    write(
        &odd,
        r#"{"basePath": "/api/now/", "operations": {"Change Get": {"path": "table/change_request/{sys_id}", "method": "GET"}}}"#,
    );
    let out = ws
        .opmap()
        .args(["--format", "json", "validate"])
        .arg(&odd)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = stdout_json(&out);
    assert_eq!(v["valid"], true);
    assert_eq!(v["warnings"].as_array().unwrap().len(), 2);
}

#[test]
fn validate_rejects_unknown_methods() {
    let ws = Workspace::new();
    let bad = ws.path("bad.yaml");
    write(&bad, "operations:\n  X:\n    path: /x\n    method: FETCH\n");
    ws.opmap().arg("validate").arg(&bad).assert().code(2);
}

#[test]
fn validate_missing_file_is_a_runtime_error() {
    let ws = Workspace::new();
    ws.opmap()
        .arg("validate")
        .arg(ws.path("nope.json"))
        .assert()
        .code(4);
}

#[test]
fn operations_lists_keys() {
    let ws = Workspace::new();
    let out = ws
        .opmap()
        .args(["--format", "json", "operations"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = stdout_json(&out);
    let keys: Vec<_> = v
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["key"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keys, vec!["Incident.Get", "Incident.List"]);
    assert_eq!(v[0]["path"], "/api/now/table/incident/{sys_id}");
    assert_eq!(v[0]["bearer"], true);
}

#[test]
fn config_set_then_get() {
    let ws = Workspace::new();
    ws.opmap()
        .args(["config", "set", "Defaults.RetryCount", "5"])
        .assert()
        .success();

    let out = ws
        .opmap()
        .args(["--format", "json", "config", "get", "Defaults.RetryCount"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(stdout_json(&out), serde_json::json!(5));

    let saved: JsonValue =
        serde_json::from_str(&fs::read_to_string(ws.path("opmap.json")).unwrap()).unwrap();
    assert_eq!(saved["Defaults"]["RetryCount"], 5);

    ws.opmap()
        .args(["config", "unset", "Defaults.RetryCount"])
        .assert()
        .success();
    ws.opmap()
        .args(["config", "get", "Defaults.RetryCount"])
        .assert()
        .code(3);
}

#[test]
fn token_falls_back_to_settings_without_a_secret_store() {
    let ws = Workspace::new();
    ws.opmap()
        .args(["token", "set", "abc123"])
        .assert()
        .success();

    let out = ws
        .opmap()
        .args(["--format", "json", "token", "status"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = stdout_json(&out);
    assert_eq!(v["source"], "settings");
    assert_eq!(v["secret_store"], false);
}

#[test]
fn token_goes_to_the_secret_store_when_configured() {
    let ws = Workspace::new();
    let secrets = ws.path("secrets");
    ws.opmap()
        .arg("--secrets-dir")
        .arg(&secrets)
        .args(["token", "set", "abc123"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(secrets.join("opmap-token")).unwrap(),
        "abc123"
    );
    assert!(!ws.path("opmap.json").exists());

    ws.opmap()
        .arg("--secrets-dir")
        .arg(&secrets)
        .args(["token", "remove"])
        .assert()
        .success();
    assert!(!secrets.join("opmap-token").exists());
}

#[test]
fn invoke_without_base_uri_fails_with_exit_code_3() {
    let ws = Workspace::new();
    let err = ws
        .opmap()
        .args(["invoke", "Incident.Get", "--param", "sys_id=abc"])
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&err).contains("InstanceBaseUri"));
}

#[test]
fn invoke_unknown_key_fails_with_exit_code_3() {
    let ws = Workspace::new();
    let err = ws
        .opmap()
        .args(["invoke", "Nope.Nothing"])
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();
    assert!(String::from_utf8_lossy(&err).contains("Nope.Nothing"));
}

#[test]
fn dry_run_prints_the_request_with_credentials_redacted() {
    let ws = Workspace::new();
    write(
        &ws.path("opmap.json"),
        r#"{"InstanceBaseUri": "https://dev.example.com", "Token": "tok", "Defaults": {"sysparm_limit": 10}}"#,
    );
    let out = ws
        .opmap()
        .args([
            "--format",
            "json",
            "invoke",
            "Incident.Get",
            "--param",
            "sys_id=abc",
            "--dry-run",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v = stdout_json(&out);
    assert_eq!(
        v["url"],
        "https://dev.example.com/api/now/table/incident/abc?sysparm_limit=10"
    );
    assert_eq!(v["method"], "GET");
    assert_eq!(v["headers"]["Authorization"], "<redacted>");
}
