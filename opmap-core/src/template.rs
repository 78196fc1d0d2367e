//! `{name}` placeholder substitution over strings and JSON trees.
//!
//! Placeholders whose name is missing from the parameters are left in place verbatim,
//! so a template can be substituted in several passes and callers can detect what was
//! not filled with [`unresolved_placeholders`].

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

/// Call-time parameters keyed by placeholder name.
pub type TemplateParams = BTreeMap<String, JsonValue>;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}\s]+)\}").expect("valid"));

/// Substitute every string leaf of `template`. Mappings and sequences keep their shape
/// and ordering; other scalars pass through untouched.
pub fn substitute(template: &JsonValue, params: &TemplateParams) -> JsonValue {
    match template {
        JsonValue::String(s) => JsonValue::String(substitute_str(s, params)),
        JsonValue::Array(arr) => {
            JsonValue::Array(arr.iter().map(|v| substitute(v, params)).collect())
        }
        JsonValue::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                out.insert(k.clone(), substitute(v, params));
            }
            JsonValue::Object(out)
        }
        other => other.clone(),
    }
}

pub fn substitute_str(template: &str, params: &TemplateParams) -> String {
    substitute_str_with(template, params, |s| Cow::Borrowed(s))
}

/// Like [`substitute_str`], but passes each inserted value through `encode` first.
/// Text already present in the template is never encoded.
pub fn substitute_str_with<F>(template: &str, params: &TemplateParams, encode: F) -> String
where
    F: for<'a> Fn(&'a str) -> Cow<'a, str>,
{
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(v) => encode(&value_to_string(v)).into_owned(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of placeholders still present anywhere in `value`.
pub fn unresolved_placeholders(value: &JsonValue) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    collect_placeholders(value, &mut out);
    out
}

pub fn placeholders_in(s: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER_RE
        .captures_iter(s)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
}

fn collect_placeholders(value: &JsonValue, out: &mut BTreeSet<String>) {
    match value {
        JsonValue::String(s) => out.extend(placeholders_in(s).map(str::to_string)),
        JsonValue::Array(arr) => arr.iter().for_each(|v| collect_placeholders(v, out)),
        JsonValue::Object(map) => map.values().for_each(|v| collect_placeholders(v, out)),
        _ => {}
    }
}

pub fn value_to_string(v: &JsonValue) -> String {
    match v {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
