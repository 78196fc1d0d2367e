use std::sync::Arc;

use opmap_exec::registry::{LoadError, MapSource, OperationRegistry};
use opmap_exec::{DispatchError, Settings};
use serde_json::json;
use tempfile::TempDir;

const MAP: &str = r#"{
  "basePath": "/api/now",
  "operations": {
    "Incident.Get": {"path": "/table/incident/{sys_id}", "method": "GET", "auth": "Bearer"},
    "Incident.List": {"path": "/table/incident", "method": "GET", "query": {"sysparm_query": "active=true"}}
  }
}"#;

#[tokio::test]
async fn loads_once_and_serves_from_cache() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("operations.json");
    std::fs::write(&path, MAP).unwrap();

    let registry = OperationRegistry::new(MapSource::File(path.clone()));
    assert!(!registry.is_loaded());
    let op = registry.resolve("Incident.Get").await.unwrap();
    assert_eq!(op.base_path, "/api/now");
    assert!(op.definition.requires_bearer());
    assert!(registry.is_loaded());

    std::fs::remove_file(&path).unwrap();
    let keys = registry.keys().await.unwrap();
    assert_eq!(keys, vec!["Incident.Get", "Incident.List"]);
}

#[tokio::test]
async fn concurrent_first_calls_share_one_map() {
    let registry = Arc::new(OperationRegistry::new(MapSource::Inline(MAP.to_string())));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let r = registry.clone();
            tokio::spawn(async move { r.map().await.unwrap() })
        })
        .collect();
    let mut maps = Vec::new();
    for h in handles {
        maps.push(h.await.unwrap());
    }
    assert!(maps.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[tokio::test]
async fn unknown_key_is_a_lookup_error() {
    let registry = OperationRegistry::new(MapSource::Inline(MAP.to_string()));
    let err = registry.resolve("Incident.Delete").await.unwrap_err();
    assert!(matches!(err, DispatchError::Lookup(_)));
}

#[tokio::test]
async fn missing_or_invalid_source_is_a_load_error() {
    let registry = OperationRegistry::new(MapSource::File("/definitely/not/here.json".into()));
    assert!(matches!(registry.map().await, Err(LoadError::Read { .. })));
    assert!(!registry.is_loaded());

    let registry = OperationRegistry::new(MapSource::Inline(
        r#"{"operations": {"X": {"path": "", "method": "GET"}}}"#.to_string(),
    ));
    let err = registry.map().await.unwrap_err();
    assert!(matches!(err, LoadError::Invalid { .. }));
    assert!(err.to_string().contains("<inline>"));
}

#[tokio::test]
async fn relative_paths_and_free_form_keys_still_resolve() {
    let registry = OperationRegistry::new(MapSource::Inline(
        r#"{"basePath":"/api/now/","operations":{"Change Get":{"path":"table/change_request/{sys_id}","method":"GET"}}}"#
            .to_string(),
    ));
    let op = registry.resolve("Change Get").await.unwrap();
    assert_eq!(op.base_path, "/api/now/");
    assert_eq!(op.definition.path, "table/change_request/{sys_id}");
}

#[test]
fn settings_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("opmap.json");

    let s = Settings::load(&path).unwrap();
    assert!(s.get("InstanceBaseUri").is_none());
    s.set("InstanceBaseUri", json!("https://dev.example.com")).unwrap();
    s.set("Defaults.RetryCount", json!(1)).unwrap();

    let reopened = Settings::load(&path).unwrap();
    assert_eq!(reopened.instance_base_uri().unwrap(), "https://dev.example.com");
    assert_eq!(reopened.retry_count().unwrap(), Some(1));

    assert_eq!(reopened.remove("Defaults.RetryCount").unwrap(), Some(json!(1)));
    let again = Settings::load(&path).unwrap();
    assert_eq!(again.snapshot(), json!({"InstanceBaseUri": "https://dev.example.com", "Defaults": {}}));
}

#[test]
fn corrupt_settings_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("opmap.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(Settings::load(&path).is_err());
}
