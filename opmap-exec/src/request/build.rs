use std::collections::BTreeMap;

use opmap_core::template::{substitute_str_with, value_to_string};
use opmap_core::{substitute, OperationDefinition};
use serde_json::Value as JsonValue;

use crate::auth::{AuthError, AuthProvider};
use crate::config::{ConfigError, Settings, DEFAULT_LIMIT_PARAM};
use crate::request::{CallOptions, CallParams};

/// `InstanceBaseUri + base_path + path[?query]`.
///
/// Parameter values substituted into the path are percent-encoded; unresolved
/// placeholders stay in the path verbatim.
pub fn build_uri(
    settings: &Settings,
    base_path: &str,
    definition: &OperationDefinition,
    params: &CallParams,
    options: &CallOptions,
) -> Result<String, ConfigError> {
    let base_uri = settings.instance_base_uri()?;
    let path = substitute_str_with(&definition.path, params, |s| urlencoding::encode(s));
    let query = build_query(definition, params, options, settings.default_limit());

    let mut uri = format!("{base_uri}{base_path}{path}");
    let encoded = encode_query(&query);
    if !encoded.is_empty() {
        uri.push('?');
        uri.push_str(&encoded);
    }
    Ok(uri)
}

/// Map-derived query (substituted), then call options on top, then the configured
/// default limit if no limit is set by either. Null values are dropped last.
pub fn build_query(
    definition: &OperationDefinition,
    params: &CallParams,
    options: &CallOptions,
    default_limit: Option<JsonValue>,
) -> BTreeMap<String, JsonValue> {
    let mut query: BTreeMap<String, JsonValue> = definition
        .query
        .iter()
        .flatten()
        .map(|(k, v)| (k.clone(), substitute(v, params)))
        .collect();

    for (k, v) in &options.query {
        query.insert(k.clone(), v.clone());
    }

    if let Some(limit) = default_limit {
        query.entry(DEFAULT_LIMIT_PARAM.to_string()).or_insert(limit);
    }

    query.retain(|_, v| !v.is_null());
    query
}

pub fn encode_query(query: &BTreeMap<String, JsonValue>) -> String {
    query
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k),
                urlencoding::encode(&value_to_string(v))
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub fn build_body(definition: &OperationDefinition, params: &CallParams) -> Option<JsonValue> {
    definition.body.as_ref().map(|b| substitute(b, params))
}

pub async fn build_headers(
    definition: &OperationDefinition,
    options: &CallOptions,
    auth: &AuthProvider,
) -> Result<BTreeMap<String, String>, AuthError> {
    let mut headers = BTreeMap::new();
    headers.insert("Accept".to_string(), "application/json".to_string());

    if definition.requires_bearer() {
        let token = auth.get_token().await?;
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.expose()),
        );
    }

    for (name, value) in &options.headers {
        headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
        headers.insert(name.clone(), value.clone());
    }
    Ok(headers)
}
