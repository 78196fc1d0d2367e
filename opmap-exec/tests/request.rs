use std::sync::Arc;
use std::time::Duration;

use opmap_core::OperationDefinition;
use opmap_exec::auth::AuthProvider;
use opmap_exec::config::keys;
use opmap_exec::request::{build_body, build_headers, build_uri, CallOptions, CallParams, EffectiveOptions};
use opmap_exec::{AuthError, Settings};
use serde_json::{json, Value as JsonValue};

const BASE: &str = "https://dev.example.com";

fn settings(extra: JsonValue) -> Settings {
    let mut doc = json!({ "InstanceBaseUri": BASE });
    if let (Some(d), Some(e)) = (doc.as_object_mut(), extra.as_object()) {
        d.extend(e.clone());
    }
    Settings::from_value(doc)
}

fn def(v: JsonValue) -> OperationDefinition {
    serde_json::from_value(v).unwrap()
}

fn params(v: JsonValue) -> CallParams {
    serde_json::from_value(v).unwrap()
}

#[test]
fn empty_query_has_no_question_mark() {
    let d = def(json!({"path": "/table/incident/{sys_id}", "method": "GET"}));
    let uri = build_uri(
        &settings(json!({})),
        "/api/now",
        &d,
        &params(json!({"sys_id": "abc123"})),
        &CallOptions::default(),
    )
    .unwrap();
    assert_eq!(uri, "https://dev.example.com/api/now/table/incident/abc123");
}

#[test]
fn path_values_are_percent_encoded() {
    let d = def(json!({"path": "/table/{table}/{id}", "method": "GET"}));
    let uri = build_uri(
        &settings(json!({})),
        "",
        &d,
        &params(json!({"table": "a b", "id": "x/y"})),
        &CallOptions::default(),
    )
    .unwrap();
    assert_eq!(uri, "https://dev.example.com/table/a%20b/x%2Fy");
}

#[test]
fn unresolved_path_placeholder_stays_literal() {
    let d = def(json!({"path": "/table/incident/{sys_id}", "method": "GET"}));
    let uri = build_uri(&settings(json!({})), "", &d, &CallParams::new(), &CallOptions::default()).unwrap();
    assert_eq!(uri, "https://dev.example.com/table/incident/{sys_id}");
}

#[test]
fn options_query_wins_over_map_query() {
    let d = def(json!({
        "path": "/table/incident",
        "method": "GET",
        "query": {"sysparm_query": "active=true", "sysparm_fields": "number"}
    }));
    let opts = CallOptions::new().query("sysparm_fields", "sys_id");
    let uri = build_uri(&settings(json!({})), "/api/now", &d, &CallParams::new(), &opts).unwrap();
    assert_eq!(
        uri,
        "https://dev.example.com/api/now/table/incident?sysparm_fields=sys_id&sysparm_query=active%3Dtrue"
    );
}

#[test]
fn default_limit_only_fills_an_absent_limit() {
    let s = settings(json!({"Defaults": {"sysparm_limit": 25}}));
    let d = def(json!({"path": "/t", "method": "GET"}));
    let uri = build_uri(&s, "", &d, &CallParams::new(), &CallOptions::default()).unwrap();
    assert_eq!(uri, "https://dev.example.com/t?sysparm_limit=25");

    let d = def(json!({"path": "/t", "method": "GET", "query": {"sysparm_limit": "5"}}));
    let uri = build_uri(&s, "", &d, &CallParams::new(), &CallOptions::default()).unwrap();
    assert_eq!(uri, "https://dev.example.com/t?sysparm_limit=5");

    let opts = CallOptions::new().query("sysparm_limit", 7);
    let uri = build_uri(&s, "", &d, &CallParams::new(), &opts).unwrap();
    assert_eq!(uri, "https://dev.example.com/t?sysparm_limit=7");
}

#[test]
fn null_query_values_are_dropped() {
    let d = def(json!({"path": "/t", "method": "GET", "query": {"a": null, "b": "{b}"}}));
    let opts = CallOptions::new().query("c", JsonValue::Null);
    let uri = build_uri(&settings(json!({})), "", &d, &params(json!({"b": 1})), &opts).unwrap();
    assert_eq!(uri, "https://dev.example.com/t?b=1");
}

#[test]
fn missing_base_uri_is_a_config_error() {
    let d = def(json!({"path": "/t", "method": "GET"}));
    let err = build_uri(&Settings::in_memory(), "", &d, &CallParams::new(), &CallOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("InstanceBaseUri"));
}

#[test]
fn body_is_substituted_and_absent_stays_absent() {
    let d = def(json!({
        "path": "/table/change_request/{sys_id}",
        "method": "PATCH",
        "body": {"state": "{state}", "work_notes": "{work_notes}"}
    }));
    let p = params(json!({"sys_id": "abc", "state": "scheduled"}));
    assert_eq!(
        build_body(&d, &p),
        Some(json!({"state": "scheduled", "work_notes": "{work_notes}"}))
    );

    let d = def(json!({"path": "/t", "method": "GET"}));
    assert_eq!(build_body(&d, &p), None);
}

#[tokio::test]
async fn headers_add_bearer_and_let_options_win_case_insensitively() {
    let s = Arc::new(settings(json!({"Token": "tok-123"})));
    let auth = AuthProvider::new(s).with_env_var("OPMAP_TEST_REQUEST_TOKEN_UNSET");
    let d = def(json!({"path": "/t", "method": "GET", "auth": "Bearer"}));

    let h = build_headers(&d, &CallOptions::default(), &auth).await.unwrap();
    assert_eq!(h["Accept"], "application/json");
    assert_eq!(h["Authorization"], "Bearer tok-123");

    let opts = CallOptions::new().header("accept", "text/csv").header("X-Trace", "1");
    let h = build_headers(&d, &opts, &auth).await.unwrap();
    assert!(!h.contains_key("Accept"));
    assert_eq!(h["accept"], "text/csv");
    assert_eq!(h["X-Trace"], "1");
    assert_eq!(h.len(), 3);
}

#[tokio::test]
async fn bearer_without_token_fails() {
    let auth = AuthProvider::new(Arc::new(Settings::in_memory()))
        .with_env_var("OPMAP_TEST_REQUEST_TOKEN_MISSING");
    let d = def(json!({"path": "/t", "method": "GET", "auth": "Bearer"}));
    let err = build_headers(&d, &CallOptions::default(), &auth).await.unwrap_err();
    assert!(matches!(err, AuthError::TokenNotFound { .. }));

    let d = def(json!({"path": "/t", "method": "GET"}));
    let h = build_headers(&d, &CallOptions::default(), &auth).await.unwrap();
    assert!(!h.contains_key("Authorization"));
}

#[test]
fn effective_options_layer_call_then_settings_then_defaults() {
    let s = settings(json!({"Defaults": {"RetryCount": 1, "TimeoutSec": 10}}));

    let eff = EffectiveOptions::resolve(&CallOptions::default(), &s).unwrap();
    assert_eq!(eff.retry.max_retries, 1);
    assert_eq!(eff.retry.initial_delay, Duration::from_secs(2));
    assert_eq!(eff.timeout, Duration::from_secs(10));

    let opts = CallOptions::new().retry_count(0).timeout(Duration::from_secs(1));
    let eff = EffectiveOptions::resolve(&opts, &s).unwrap();
    assert_eq!(eff.retry.max_retries, 0);
    assert_eq!(eff.timeout, Duration::from_secs(1));

    s.set(keys::RETRY_COUNT, json!("many")).unwrap();
    assert!(EffectiveOptions::resolve(&CallOptions::default(), &s).is_err());
}
