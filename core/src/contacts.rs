//! Contact actions.

use crate::client::Client;
use crate::error::ApiError;
use crate::http::Transport;
use crate::response::NormalizedResult;
use crate::types::RequestOptions;

/// Contact actions, borrowed from a [`Client`] via [`Client::contacts`].
///
/// Custom fields are passed with [`RequestOptions::field`] and list
/// subscriptions as `p[LIST_ID]` / `status[LIST_ID]` parameters.
#[derive(Debug)]
pub struct Contacts<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Contacts<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Create a contact. Returns `subscriber_id` on success.
    pub fn contact_add(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.post("contact_add", options)
    }

    /// Update the contact identified by the `id` parameter.
    pub fn contact_edit(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.post("contact_edit", options)
    }

    /// Create the contact, or update it when the email is already known.
    pub fn contact_sync(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.post("contact_sync", options)
    }

    pub fn contact_delete(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("contact_delete", options)
    }

    /// List contacts by `ids` (comma separated, or `all`).
    pub fn contact_list(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("contact_list", options)
    }

    pub fn contact_view(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("contact_view", options)
    }

    pub fn contact_view_email(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("contact_view_email", options)
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::{recording_client, RecordingTransport};
    use crate::client::Client;
    use crate::http::HttpMethod;
    use crate::types::RequestOptions;

    const OK: &str = r#"{"result_code":1,"result_message":"ok","result_output":"json","subscriber_id":1}"#;

    fn assert_sent(client: &Client<RecordingTransport>, action: &str, method: HttpMethod) {
        let req = client.transport().last();
        assert_eq!(req.query_value("api_action"), Some(action));
        assert_eq!(req.method, method, "{action}");
    }

    #[test]
    fn actions_use_their_own_name_and_method() {
        let client = recording_client(OK);
        let contacts = client.contacts();

        contacts.contact_add(RequestOptions::new()).unwrap();
        assert_sent(&client, "contact_add", HttpMethod::Post);
        contacts.contact_edit(RequestOptions::new()).unwrap();
        assert_sent(&client, "contact_edit", HttpMethod::Post);
        contacts.contact_sync(RequestOptions::new()).unwrap();
        assert_sent(&client, "contact_sync", HttpMethod::Post);
        contacts.contact_delete(RequestOptions::new()).unwrap();
        assert_sent(&client, "contact_delete", HttpMethod::Get);
        contacts.contact_list(RequestOptions::new()).unwrap();
        assert_sent(&client, "contact_list", HttpMethod::Get);
        contacts.contact_view(RequestOptions::new()).unwrap();
        assert_sent(&client, "contact_view", HttpMethod::Get);
        contacts.contact_view_email(RequestOptions::new()).unwrap();
        assert_sent(&client, "contact_view_email", HttpMethod::Get);

        assert_eq!(client.transport().requests.borrow().len(), 7);
    }

    #[test]
    fn contact_add_sends_custom_fields_in_body() {
        let client = recording_client(OK);
        let result = client
            .contacts()
            .contact_add(
                RequestOptions::new()
                    .param("email", "jane@example.com")
                    .param("p", serde_json::json!({"3": 3}))
                    .field("first_name", "Jane"),
            )
            .unwrap();
        assert_eq!(result["subscriber_id"], 1);

        let body = client.transport().last().body.unwrap();
        assert_eq!(
            body,
            "email=jane%40example.com&field%5B%25first_name%25%2C0%5D=Jane&p%5B3%5D=3"
        );
    }
}
