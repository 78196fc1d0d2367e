use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

use crate::transport::HttpRequest;

const REDACTED: &str = "<redacted>";
const SENSITIVE: &[&str] = &["authorization", "cookie", "set-cookie", "proxy-authorization"];

/// Copy of `headers` with credential-bearing values replaced.
pub fn redact_headers(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| {
            let sensitive = SENSITIVE.iter().any(|s| k.eq_ignore_ascii_case(s));
            let v = if sensitive { REDACTED.to_string() } else { v.clone() };
            (k.clone(), v)
        })
        .collect()
}

/// Printable view of a request with credentials redacted.
pub fn redact_request(req: &HttpRequest) -> JsonValue {
    json!({
        "method": req.method.as_str(),
        "url": req.url,
        "headers": redact_headers(&req.headers),
        "body": req.body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_case_insensitively() {
        let mut h = BTreeMap::new();
        h.insert("AUTHORIZATION".to_string(), "Bearer abc".to_string());
        h.insert("Cookie".to_string(), "s=1".to_string());
        h.insert("Accept".to_string(), "application/json".to_string());
        let out = redact_headers(&h);
        assert_eq!(out["AUTHORIZATION"], REDACTED);
        assert_eq!(out["Cookie"], REDACTED);
        assert_eq!(out["Accept"], "application/json");
    }
}
