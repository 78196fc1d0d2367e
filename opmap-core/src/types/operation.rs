use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value as JsonValue;

/// HTTP verbs an operation may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AuthMode {
    Bearer,
}

/// One entry of the operation map.
///
/// `query` values and every string leaf of `body` may carry `{name}` placeholders
/// that are filled from call parameters at dispatch time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OperationDefinition {
    pub path: String,

    pub method: HttpMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<BTreeMap<String, JsonValue>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OperationDefinition {
    pub fn requires_bearer(&self) -> bool {
        matches!(self.auth, Some(AuthMode::Bearer))
    }
}
