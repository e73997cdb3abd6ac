//! Campaign actions.
//!
//! `campaign_create` takes the campaign definition as form parameters
//! (`type`, `name`, `sdate`, `status`, `public`, `tracklinks`, and the
//! `p[LIST_ID]` / `m[MESSAGE_ID]` maps). The remaining actions identify a
//! campaign by its `id` query parameter.

use crate::client::Client;
use crate::error::ApiError;
use crate::http::Transport;
use crate::response::NormalizedResult;
use crate::types::RequestOptions;

#[derive(Debug)]
pub struct Campaigns<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Campaigns<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    pub fn campaign_create(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.post("campaign_create", options)
    }

    pub fn campaign_delete(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("campaign_delete", options)
    }

    pub fn campaign_list(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("campaign_list", options)
    }

    /// Send a campaign to one address (`email`), as a test (`type=test`) or
    /// for real.
    pub fn campaign_send(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("campaign_send", options)
    }

    /// Change a campaign's `status` (0 draft, 1 scheduled, 2 sending,
    /// 3 paused, 4 stopped, 5 completed).
    pub fn campaign_status(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("campaign_status", options)
    }
}
