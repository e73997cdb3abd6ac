//! Caller-facing request options.
//!
//! # Design
//! Every API action takes a loose bag of parameters. Two keys are special:
//! `query` is always sent in the query string, and `fields` holds custom
//! contact fields that POST rewrites into the `field[%name%,0]` convention.
//! `RequestOptions` pulls those two out up front so the request builder never
//! has to mutate the caller's mapping.

use serde_json::{Map, Value};

use crate::error::ApiError;

const QUERY_KEY: &str = "query";
const FIELDS_KEY: &str = "fields";

/// Parameters for a single API call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    query: Map<String, Value>,
    fields: Map<String, Value>,
    params: Map<String, Value>,
    // Set by `param` when `query` or `fields` is not an object; reported at build time.
    invalid: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a JSON object into options, extracting the `query` and `fields`
    /// entries. Both must be objects when present.
    pub fn from_map(mut map: Map<String, Value>) -> Result<Self, ApiError> {
        let query = take_object(&mut map, QUERY_KEY)?;
        let fields = take_object(&mut map, FIELDS_KEY)?;
        Ok(Self {
            query,
            fields,
            params: map,
            invalid: None,
        })
    }

    /// Add an entry to the `query` mapping.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a custom field. Only sent with POST.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a regular parameter: query string for GET, form body for POST.
    ///
    /// An object passed as `query` or `fields` is merged into those mappings,
    /// the same way [`RequestOptions::from_map`] extracts them. Any other
    /// non-null value under those keys makes the request fail to build.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        let target = match key.as_str() {
            QUERY_KEY => &mut self.query,
            FIELDS_KEY => &mut self.fields,
            _ => {
                self.params.insert(key, value);
                return self;
            }
        };
        match value {
            Value::Null => {}
            Value::Object(inner) => target.extend(inner),
            other => self.invalid = Some(not_an_object(&key, &other)),
        }
        self
    }

    pub fn query_params(&self) -> &Map<String, Value> {
        &self.query
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        match &self.invalid {
            Some(message) => Err(ApiError::InvalidOptions(message.clone())),
            None => Ok(()),
        }
    }
}

impl TryFrom<Value> for RequestOptions {
    type Error = ApiError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::from_map(map),
            Value::Null => Ok(Self::default()),
            other => Err(ApiError::InvalidOptions(format!(
                "options must be a JSON object, got {other}"
            ))),
        }
    }
}

fn take_object(map: &mut Map<String, Value>, key: &str) -> Result<Map<String, Value>, ApiError> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(inner)) => Ok(inner),
        Some(other) => Err(ApiError::InvalidOptions(not_an_object(key, &other))),
    }
}

fn not_an_object(key: &str, value: &Value) -> String {
    format!("`{key}` must be a JSON object, got {value}")
}
