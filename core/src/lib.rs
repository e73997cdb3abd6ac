//! Synchronous client for the ActiveCampaign v1 API.
//!
//! # Overview
//! Every call is one request to `{api_endpoint}/admin/api.php`, naming the
//! remote action in the `api_action` query parameter next to `api_key` and
//! `api_output`. Responses are normalized into a `NormalizedResult`: the
//! reserved `result_*` keys are moved aside, and numeric-keyed list payloads
//! become a single `results` array.
//!
//! # Design
//! - `Client` is stateless apart from its immutable `ClientConfig`.
//! - Request building and response parsing are pure; only the `Transport`
//!   does I/O. `UreqTransport` is the blocking default.
//! - `Contacts`, `Lists` and `Campaigns` borrow the client and forward to
//!   `get` / `post` with their own action names.

pub mod campaigns;
pub mod client;
pub mod config;
pub mod contacts;
pub mod encoding;
pub mod error;
pub mod http;
pub mod lists;
pub mod response;
pub mod types;

pub use campaigns::Campaigns;
pub use client::Client;
pub use config::{ClientConfig, ClientOptions};
pub use contacts::Contacts;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use lists::Lists;
pub use response::{NormalizedResult, ResponseMeta};
pub use types::RequestOptions;
