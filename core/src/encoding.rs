//! Nested form encoding shared by query strings and POST bodies.
//!
//! The API reads parameters in the bracketed form popularised by Rails:
//! nested objects become `parent[child]=v`, arrays become `parent[]=v`, and
//! sibling entries are emitted sorted by their encoded text. Empty nested
//! objects and arrays are dropped entirely.

use serde_json::{Map, Value};

/// Flatten a parameter mapping into ordered `(key, value)` pairs, unescaped.
pub fn form_pairs(params: &Map<String, Value>) -> Vec<(String, String)> {
    object_pairs(params, None)
}

/// Encode a parameter mapping as an `application/x-www-form-urlencoded` string.
pub fn to_form(params: &Map<String, Value>) -> String {
    join_pairs(&form_pairs(params))
}

/// Escape and join already flattened pairs.
pub fn join_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", escape(key), escape(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode everything except ASCII alphanumerics and `_ . - ~`;
/// spaces become `+`.
pub fn escape(raw: &str) -> String {
    // A literal "%20" in the input is encoded as "%2520", so only real spaces match.
    urlencoding::encode(raw).replace("%20", "+")
}

fn object_pairs(map: &Map<String, Value>, namespace: Option<&str>) -> Vec<(String, String)> {
    let mut groups: Vec<Vec<(String, String)>> = map
        .iter()
        .filter(|(_, value)| !is_empty_container(value))
        .map(|(key, value)| {
            let key = match namespace {
                Some(ns) => format!("{ns}[{key}]"),
                None => key.clone(),
            };
            value_pairs(value, &key)
        })
        .collect();

    if !namespace.is_some_and(|ns| ns.contains("[]")) {
        groups.sort_by_cached_key(|group| join_pairs(group));
    }

    groups.into_iter().flatten().collect()
}

fn value_pairs(value: &Value, key: &str) -> Vec<(String, String)> {
    match value {
        Value::Object(map) => object_pairs(map, Some(key)),
        Value::Array(items) => {
            let prefix = format!("{key}[]");
            if items.is_empty() {
                return vec![(prefix, String::new())];
            }
            items.iter().flat_map(|item| value_pairs(item, &prefix)).collect()
        }
        Value::Null => vec![(key.to_string(), String::new())],
        Value::String(s) => vec![(key.to_string(), s.clone())],
        other => vec![(key.to_string(), other.to_string())],
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
