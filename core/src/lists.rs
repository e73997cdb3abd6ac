//! Mailing list actions.

use crate::client::Client;
use crate::error::ApiError;
use crate::http::Transport;
use crate::response::NormalizedResult;
use crate::types::RequestOptions;

#[derive(Debug)]
pub struct Lists<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Lists<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    pub fn list_add(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.post("list_add", options)
    }

    pub fn list_edit(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.post("list_edit", options)
    }

    pub fn list_delete(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("list_delete", options)
    }

    /// Rows come back under `results`.
    pub fn list_list(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("list_list", options)
    }

    pub fn list_view(&self, options: RequestOptions) -> Result<NormalizedResult, ApiError> {
        self.client.get("list_view", options)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::testing::recording_client;
    use crate::http::HttpMethod;
    use crate::types::RequestOptions;

    #[test]
    fn list_list_normalizes_rows() {
        let client = recording_client(
            r#"{"0":{"id":"1","name":"Newsletter"},"1":{"id":"2","name":"Offers"},"result_code":1,"result_message":"ok","result_output":"json"}"#,
        );
        let result = client
            .lists()
            .list_list(RequestOptions::new().param("ids", "all"))
            .unwrap();
        let rows = result.results().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["name"], "Offers");

        let req = client.transport().last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.query_value("api_action"), Some("list_list"));
        assert_eq!(req.query_value("ids"), Some("all"));
    }

    #[test]
    fn writes_are_posted_and_reads_are_gets() {
        let client = recording_client(r#"{"result_code":1,"id":4}"#);
        let lists = client.lists();

        lists.list_add(RequestOptions::new().param("name", "Beta testers")).unwrap();
        let req = client.transport().last();
        assert_eq!((req.method, req.query_value("api_action")), (HttpMethod::Post, Some("list_add")));
        assert_eq!(req.body.as_deref(), Some("name=Beta+testers"));

        lists.list_edit(RequestOptions::new().param("id", 4)).unwrap();
        assert_eq!(client.transport().last().method, HttpMethod::Post);

        for result in [
            lists.list_delete(RequestOptions::new().param("id", 4)),
            lists.list_view(RequestOptions::new().param("id", 4)),
        ] {
            assert_eq!(result.unwrap().to_value(), json!({"id": 4}));
            assert_eq!(client.transport().last().method, HttpMethod::Get);
        }
    }
}
