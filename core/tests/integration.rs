//! Contact, list and campaign lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every resource group
//! through `Client` with the default `UreqTransport`, so request encoding,
//! the real HTTP round-trip and normalization are all exercised together.

use activecampaign_core::{ApiError, Client, ClientConfig, ClientOptions, RequestOptions};
use serde_json::json;

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, mock_server::DEFAULT_API_KEY).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: std::net::SocketAddr, api_key: &str) -> Client {
    Client::with_options(
        ClientOptions {
            api_key: Some(api_key.to_string()),
            api_endpoint: Some(format!("http://{addr}")),
            ..ClientOptions::default()
        },
        &ClientConfig::default(),
    )
}

#[test]
fn resource_lifecycle() {
    let addr = start_server();
    let client = client(addr, mock_server::DEFAULT_API_KEY);

    // Step 1: no contacts yet, so the metadata-only response normalizes to an empty list.
    let result = client
        .contacts()
        .contact_list(RequestOptions::new().param("ids", "all"))
        .unwrap();
    assert_eq!(result.to_value(), json!({"results": []}));
    assert!(!result.meta().succeeded());

    // Step 2: create a list.
    let result = client
        .lists()
        .list_add(RequestOptions::new().param("name", "Newsletter"))
        .unwrap();
    assert!(result.meta().succeeded());
    let list_id = result["id"].as_u64().unwrap();

    // Step 3: add a contact with a custom field, subscribed to the list.
    let result = client
        .contacts()
        .contact_add(
            RequestOptions::new()
                .param("email", "jane@example.com")
                .param("first_name", "Jane")
                .param("p", json!({ list_id.to_string(): list_id }))
                .field("PERS_1", "Gold tier"),
        )
        .unwrap();
    assert_eq!(result.meta().result_message.as_deref(), Some("Contact added"));
    let jane = result["subscriber_id"].as_u64().unwrap();

    // Step 4: view it back; custom field and subscription survived the wire.
    let result = client
        .contacts()
        .contact_view(RequestOptions::new().param("id", jane))
        .unwrap();
    assert_eq!(result.get_str("email"), Some("jane@example.com"));
    assert_eq!(result["fields"]["PERS_1"], "Gold tier");
    assert_eq!(result["lists"], json!([list_id]));
    assert!(!result.contains_key("result_code"));

    // Step 5: sync a second contact and update the first one by email.
    client
        .contacts()
        .contact_sync(RequestOptions::new().param("email", "sam@example.com"))
        .unwrap();
    let result = client
        .contacts()
        .contact_sync(
            RequestOptions::new()
                .param("email", "jane@example.com")
                .param("last_name", "Doe"),
        )
        .unwrap();
    assert_eq!(result["subscriber_id"], jane);

    // Step 6: list; numeric keys become `results`.
    let result = client
        .contacts()
        .contact_list(RequestOptions::new().query("ids", "all"))
        .unwrap();
    let rows = result.results().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|row| row["last_name"] == "Doe"));

    // Step 7: edit and look up by email.
    client
        .contacts()
        .contact_edit(
            RequestOptions::new()
                .query("id", jane)
                .param("id", jane)
                .param("first_name", "Janet"),
        )
        .unwrap();
    let result = client
        .contacts()
        .contact_view_email(RequestOptions::new().param("email", "jane@example.com"))
        .unwrap();
    assert_eq!(result.get_str("first_name"), Some("Janet"));

    // Step 8: campaign create, status, send, list, delete.
    let result = client
        .campaigns()
        .campaign_create(
            RequestOptions::new()
                .param("type", "single")
                .param("name", "Launch")
                .param("p", json!({ list_id.to_string(): list_id })),
        )
        .unwrap();
    let campaign = result["id"].as_u64().unwrap();

    let result = client
        .campaigns()
        .campaign_status(RequestOptions::new().param("id", campaign).param("status", 3))
        .unwrap();
    assert!(result.meta().succeeded());

    let result = client
        .campaigns()
        .campaign_send(
            RequestOptions::new()
                .param("id", campaign)
                .param("email", "jane@example.com")
                .param("type", "test"),
        )
        .unwrap();
    assert_eq!(result.meta().result_message.as_deref(), Some("Campaign sent"));

    let result = client
        .campaigns()
        .campaign_list(RequestOptions::new().param("ids", campaign.to_string()))
        .unwrap();
    let rows = result.results().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["status"], 3);

    client
        .campaigns()
        .campaign_delete(RequestOptions::new().param("id", campaign))
        .unwrap();

    // Step 9: delete the list, then the contact.
    let result = client
        .lists()
        .list_delete(RequestOptions::new().param("id", list_id))
        .unwrap();
    assert!(result.meta().succeeded());
    let result = client
        .lists()
        .list_view(RequestOptions::new().param("id", list_id))
        .unwrap();
    assert!(!result.meta().succeeded());

    client
        .contacts()
        .contact_delete(RequestOptions::new().param("id", jane))
        .unwrap();
    let result = client
        .contacts()
        .contact_view(RequestOptions::new().param("id", jane))
        .unwrap();
    assert_eq!(result.meta().result_code, Some(json!(0)));
}

#[test]
fn wrong_key_is_reported_through_metadata() {
    let addr = start_server();
    let client = client(addr, "wrong-key");

    let result = client.get("list_list", RequestOptions::new().param("ids", "all")).unwrap();
    assert!(!result.meta().succeeded());
    assert_eq!(
        result.meta().result_message.as_deref(),
        Some("You are not authorized to access this file")
    );
}

#[test]
fn non_json_body_is_deserialization_error() {
    let addr = start_server();
    let client = Client::new(ClientConfig {
        api_key: mock_server::DEFAULT_API_KEY.to_string(),
        api_endpoint: format!("http://{addr}"),
        api_output: "xml".to_string(),
        ..ClientConfig::default()
    });

    let err = client.get("list_list", RequestOptions::new()).unwrap_err();
    assert!(matches!(err, ApiError::DeserializationError(_)));
}

#[test]
fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, "k").get("list_list", RequestOptions::new()).unwrap_err();
    assert!(matches!(err, ApiError::TransportError(_)));
}
