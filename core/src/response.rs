//! Response normalization.
//!
//! Every API response is a JSON object with three reserved metadata keys
//! (`result_code`, `result_message`, `result_output`) next to the payload.
//! List actions encode their rows as `"0"`, `"1"`, ... keys instead of an
//! array; [`normalize`] turns those into a single `results` array so callers
//! see one shape for every list.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

const RESULT_CODE: &str = "result_code";
const RESULT_MESSAGE: &str = "result_message";
const RESULT_OUTPUT: &str = "result_output";

/// Key holding the rows of a list-shaped response.
pub const RESULTS_KEY: &str = "results";

/// The reserved metadata stripped from a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseMeta {
    pub result_code: Option<Value>,
    pub result_message: Option<String>,
    pub result_output: Option<String>,
}

impl ResponseMeta {
    /// `true` when the API reported `result_code` 1 (as number or string).
    pub fn succeeded(&self) -> bool {
        match &self.result_code {
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            Some(Value::String(s)) => s == "1",
            _ => false,
        }
    }
}

/// A response payload with the reserved keys removed.
///
/// Keys keep document order. Lookups try an exact match first and fall back
/// to an ASCII case-insensitive match. Only top-level keys get that fallback:
/// nested values are plain [`Value`]s, so `result["contact"]["ID"]` matches
/// exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedResult {
    entries: IndexMap<String, Value>,
    #[serde(skip)]
    meta: ResponseMeta,
}

impl NormalizedResult {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).or_else(|| {
            self.entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Rows of a list-shaped response.
    pub fn results(&self) -> Option<&Vec<Value>> {
        self.get(RESULTS_KEY).and_then(Value::as_array)
    }

    pub fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_map(self) -> IndexMap<String, Value> {
        self.entries
    }

    /// The payload as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl std::ops::Index<&str> for NormalizedResult {
    type Output = Value;

    /// Returns `Value::Null` for a missing key, like indexing a `serde_json::Value`.
    fn index(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.get(key).unwrap_or(&NULL)
    }
}

/// Decode a response body and normalize its shape.
pub fn normalize(body: &str) -> Result<NormalizedResult, ApiError> {
    // IndexMap keeps the numeric rows in document order.
    let document: IndexMap<String, Value> = serde_json::from_str(body)?;

    let mut meta = ResponseMeta::default();
    let mut entries = IndexMap::with_capacity(document.len());
    for (key, value) in document {
        match key.as_str() {
            RESULT_CODE => meta.result_code = Some(value),
            RESULT_MESSAGE => meta.result_message = text(value),
            RESULT_OUTPUT => meta.result_output = text(value),
            _ => {
                entries.insert(key, value);
            }
        }
    }

    if entries.keys().all(|key| is_numeric_key(key)) {
        let rows: Vec<Value> = entries.into_values().collect();
        entries = IndexMap::from([(RESULTS_KEY.to_string(), Value::Array(rows))]);
    }

    Ok(NormalizedResult { entries, meta })
}

/// Matches `^[+-]?\d+$`.
pub fn is_numeric_key(key: &str) -> bool {
    let digits = key.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(key);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
