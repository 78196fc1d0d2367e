use serde_json::Value as JsonValue;

use crate::types::{OperationDefinition, OperationsMap};

use super::validator::{Validator, KEY_RE};

pub(crate) fn check_map(v: &mut Validator, map: &OperationsMap) {
    if !map.base_path.is_empty() && !map.base_path.starts_with('/') {
        v.warn("basePath", "does not start with '/'");
    }
    if map.base_path.contains('?') {
        v.warn("basePath", "contains a query string");
    }
    if map.operations.is_empty() {
        v.warn("operations", "no operations defined");
    }

    for (key, op) in &map.operations {
        let at = format!("operations.{key}");
        if key.trim().is_empty() {
            v.error("operations", "operation key must not be empty");
        } else if !KEY_RE.is_match(key) {
            v.warn(&at, "operation key is not dot-separated segments of [A-Za-z0-9_-]");
        }
        check_operation(v, &at, op);
    }
}

fn check_operation(v: &mut Validator, at: &str, op: &OperationDefinition) {
    if op.path.trim().is_empty() {
        v.error(format!("{at}.path"), "must not be empty");
    } else if !op.path.starts_with('/') {
        v.warn(format!("{at}.path"), "does not start with '/'");
    }
    if op.path.contains('?') {
        v.warn(format!("{at}.path"), "embeds a query string (use `query`)");
    }

    for (name, value) in op.query.iter().flatten() {
        if name.is_empty() {
            v.error(format!("{at}.query"), "parameter name must not be empty");
        }
        if matches!(value, JsonValue::Array(_) | JsonValue::Object(_)) {
            v.error(format!("{at}.query.{name}"), "must be a scalar value template");
        }
    }

    if op.body.as_ref().is_some_and(|b| !b.is_object()) {
        v.error(format!("{at}.body"), "must be a mapping");
    }
}
