//! Request pipeline for the ActiveCampaign API.
//!
//! # Design
//! `Client` holds an immutable `ClientConfig` and a `Transport`. Every call
//! goes through the same three steps: `build_get` / `build_post` produce an
//! `HttpRequest`, the transport executes it, and `parse_response` normalizes
//! the body. The build and parse steps never touch the network, so they can
//! be exercised directly.
//!
//! The operation name travels only as the `api_action` query parameter; the
//! URL is always `{api_endpoint}/{api_path}`.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::campaigns::Campaigns;
use crate::config::{ClientConfig, ClientOptions};
use crate::contacts::Contacts;
use crate::encoding;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::lists::Lists;
use crate::response::{self, NormalizedResult};
use crate::types::RequestOptions;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Synchronous client for the ActiveCampaign API.
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl Client<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self { config, transport }
    }

    /// Resolve per-client `options` over `defaults` and build a client.
    pub fn with_options(options: ClientOptions, defaults: &ClientConfig) -> Self {
        Self::new(options.resolve(defaults))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn options(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `true` when `other` is value-equal to this client's configuration.
    pub fn same_options(&self, other: &ClientConfig) -> bool {
        self.config == *other
    }

    pub fn contacts(&self) -> Contacts<'_, T> {
        Contacts::new(self)
    }

    pub fn lists(&self) -> Lists<'_, T> {
        Lists::new(self)
    }

    pub fn campaigns(&self) -> Campaigns<'_, T> {
        Campaigns::new(self)
    }

    /// Send a read request for `operation`.
    pub fn get(&self, operation: &str, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        let request = self.build_get(operation, &options)?;
        self.send(operation, &request)
    }

    /// Send a create/update request for `operation`.
    pub fn post(&self, operation: &str, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        let request = self.build_post(operation, &options)?;
        self.send(operation, &request)
    }

    /// Build a GET request. Every non-`query` parameter is merged into the
    /// query string; `fields` are not sent.
    pub fn build_get(&self, operation: &str, options: &RequestOptions) -> Result<HttpRequest, ApiError> {
        check_operation(operation)?;
        options.validate()?;
        if !options.fields().is_empty() {
            debug!(action = operation, "ignoring custom fields on a GET request");
        }

        let mut query = options.query_params().clone();
        for (key, value) in options.params() {
            query.insert(key.clone(), value.clone());
        }

        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: self.config.endpoint_url(),
            query: self.finish_query(query, operation),
            headers: self.headers(),
            body: None,
        })
    }

    /// Build a POST request. Parameters and custom fields go into a form
    /// body; only `query` entries reach the query string.
    pub fn build_post(&self, operation: &str, options: &RequestOptions) -> Result<HttpRequest, ApiError> {
        check_operation(operation)?;
        options.validate()?;

        let mut form = options.params().clone();
        form.insert("field".to_string(), Value::Object(custom_fields(options.fields())));

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.config.endpoint_url(),
            query: self.finish_query(options.query_params().clone(), operation),
            headers: self.headers(),
            body: Some(encoding::to_form(&form)),
        })
    }

    /// Normalize a raw response. The HTTP status is logged but never checked;
    /// the API reports failures through `result_code`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<NormalizedResult, ApiError> {
        if !(200..300).contains(&response.status) {
            warn!(status = response.status, "unexpected HTTP status, decoding body anyway");
        }
        response::normalize(&response.body).inspect_err(|_| {
            let content_type = response.header("Content-Type").unwrap_or("unknown");
            warn!(status = response.status, content_type, "response body is not a JSON object");
        })
    }

    fn send(&self, operation: &str, request: &HttpRequest) -> Result<NormalizedResult, ApiError> {
        debug!(method = request.method.as_str(), action = operation, url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        self.parse_response(response)
    }

    /// Overlay the fixed keys last so callers can never replace them.
    fn finish_query(&self, mut query: Map<String, Value>, operation: &str) -> Vec<(String, String)> {
        query.insert("api_key".to_string(), Value::from(self.config.api_key.as_str()));
        query.insert("api_action".to_string(), Value::from(operation));
        query.insert("api_output".to_string(), Value::from(self.config.api_output.as_str()));
        encoding::form_pairs(&query)
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("User-Agent".to_string(), self.config.user_agent.clone()),
            ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
        ]
    }
}

/// Rewrite `{name: value}` into the API's `{"%name%,0": value}` custom-field keys.
fn custom_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (format!("%{name}%,0"), value.clone()))
        .collect()
}

fn check_operation(operation: &str) -> Result<(), ApiError> {
    if operation.is_empty() {
        return Err(ApiError::InvalidOptions("operation name must not be empty".to_string()));
    }
    Ok(())
}
