use std::sync::Arc;
use std::time::Duration;

use opmap_exec::dispatch::{StdoutEventSink, TracingEventSink, NoOpEventSink};
use opmap_exec::registry::LoadError;
use opmap_exec::{
    AuthProvider, DispatchError, Dispatcher, EventSink, FileSecretStore, MapSource,
    OperationRegistry, ReqwestTransport, Settings,
};
use serde_json::Value as JsonValue;

use crate::args::{EventsMode, GlobalArgs, PathArgs};
use crate::exit_codes;

/// `KEY=VALUE`, where numbers, booleans and `null` keep their JSON type.
pub fn parse_kv(s: &str) -> Result<(String, JsonValue), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    if k.trim().is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((k.to_string(), parse_scalar(v)))
}

pub fn parse_header(s: &str) -> Result<(String, String), String> {
    let idx = s
        .find(['=', ':'])
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    let (k, v) = (&s[..idx], &s[idx + 1..]);
    let k = k.trim();
    if k.is_empty() {
        return Err(format!("empty header name in `{s}`"));
    }
    Ok((k.to_string(), v.trim().to_string()))
}

pub fn parse_secs(s: &str) -> Result<Duration, String> {
    s.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| format!("expected a non-negative number of seconds, got `{s}`"))
}

fn parse_scalar(v: &str) -> JsonValue {
    match serde_json::from_str::<JsonValue>(v) {
        Ok(j @ (JsonValue::Number(_) | JsonValue::Bool(_) | JsonValue::Null)) => j,
        _ => JsonValue::String(v.to_string()),
    }
}

/// Setting values may be any JSON document; bare text is stored as a string.
pub fn parse_setting_value(v: &str) -> JsonValue {
    serde_json::from_str(v).unwrap_or_else(|_| JsonValue::String(v.to_string()))
}

pub fn open_settings(paths: &PathArgs) -> Result<Arc<Settings>, String> {
    Settings::load(&paths.config)
        .map(Arc::new)
        .map_err(|e| e.to_string())
}

pub fn auth_provider(settings: Arc<Settings>, paths: &PathArgs) -> AuthProvider {
    let auth = AuthProvider::new(settings);
    match &paths.secrets_dir {
        Some(dir) => auth.with_secret_store(Arc::new(FileSecretStore::new(dir))),
        None => auth,
    }
}

pub fn registry(paths: &PathArgs) -> OperationRegistry {
    OperationRegistry::new(MapSource::File(paths.map.clone()))
}

pub fn event_sink(mode: EventsMode) -> Arc<dyn EventSink> {
    match mode {
        EventsMode::None => Arc::new(NoOpEventSink),
        EventsMode::Stdout => Arc::new(StdoutEventSink),
        EventsMode::Tracing => Arc::new(TracingEventSink),
    }
}

pub fn build_dispatcher(global: &GlobalArgs) -> Result<Dispatcher, String> {
    let settings = open_settings(&global.paths)?;
    let auth = auth_provider(settings.clone(), &global.paths);
    let transport = ReqwestTransport::new().map_err(|e| e.to_string())?;
    Ok(Dispatcher::new(
        Arc::new(registry(&global.paths)),
        settings,
        Arc::new(auth),
        Arc::new(transport),
    )
    .with_events(event_sink(global.events)))
}

pub fn exit_code_for(err: &DispatchError) -> i32 {
    match err {
        DispatchError::Load(LoadError::Invalid { .. }) => exit_codes::VALIDATION_FAILED,
        DispatchError::Load(LoadError::Read { .. }) => exit_codes::RUNTIME_ERROR,
        _ => exit_codes::CALL_FAILED,
    }
}
