use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Form, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub const API_PATH: &str = "/admin/api.php";
pub const DEFAULT_API_KEY: &str = "test-api-key";

#[derive(Clone, Debug, Serialize)]
pub struct Contact {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub fields: BTreeMap<String, String>,
    pub lists: Vec<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MailingList {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Campaign {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: u8,
    pub lists: Vec<u64>,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: u64,
    contacts: BTreeMap<u64, Contact>,
    lists: BTreeMap<u64, MailingList>,
    campaigns: BTreeMap<u64, Campaign>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;
type Params = HashMap<String, String>;

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
    db: Db,
}

pub fn app() -> Router {
    app_with_key(DEFAULT_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        db: Arc::new(RwLock::new(Store::default())),
    };
    Router::new()
        .route(API_PATH, get(handle_get).post(handle_post))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_key(api_key)).await
}

async fn handle_get(State(state): State<AppState>, Query(query): Query<Params>) -> Response {
    respond(&state, query, Params::new()).await
}

async fn handle_post(
    State(state): State<AppState>,
    Query(query): Query<Params>,
    Form(form): Form<Params>,
) -> Response {
    respond(&state, query, form).await
}

async fn respond(state: &AppState, query: Params, form: Params) -> Response {
    if query.get("api_output").map(String::as_str) != Some("json") {
        return (
            [(header::CONTENT_TYPE, "text/xml")],
            "<?xml version=\"1.0\"?><result><result_code>0</result_code></result>",
        )
            .into_response();
    }
    if query.get("api_key").map(String::as_str) != Some(&*state.api_key) {
        return Json(failure("You are not authorized to access this file")).into_response();
    }

    let action = query.get("api_action").cloned().unwrap_or_default();
    // Form values win over query values of the same name.
    let mut params = query;
    params.extend(form);
    params.retain(|key, _| !matches!(key.as_str(), "api_key" | "api_action" | "api_output"));

    info!(action = %action, "handling request");

    let mut store = state.db.write().await;
    let body = match action.as_str() {
        "contact_add" => contact_add(&mut store, &params),
        "contact_edit" => contact_edit(&mut store, &params),
        "contact_sync" => contact_sync(&mut store, &params),
        "contact_delete" => delete(&mut store.contacts, &params, "Contact deleted"),
        "contact_list" => list(&store.contacts, &params),
        "contact_view" => view(&store.contacts, &params),
        "contact_view_email" => contact_view_email(&store, &params),
        "list_add" => list_add(&mut store, &params),
        "list_edit" => list_edit(&mut store, &params),
        "list_delete" => list_delete(&mut store, &params),
        "list_list" => list(&store.lists, &params),
        "list_view" => view(&store.lists, &params),
        "campaign_create" => campaign_create(&mut store, &params),
        "campaign_delete" => delete(&mut store.campaigns, &params, "Campaign deleted"),
        "campaign_list" => list(&store.campaigns, &params),
        "campaign_send" => campaign_send(&store, &params),
        "campaign_status" => campaign_status(&mut store, &params),
        other => failure(&format!("Unknown api_action: {other}")),
    };
    Json(body).into_response()
}

// --- response shapes ---

fn with_result(mut body: Map<String, Value>, code: u8, message: &str) -> Value {
    body.insert("result_code".to_string(), Value::from(code));
    body.insert("result_message".to_string(), Value::from(message));
    body.insert("result_output".to_string(), Value::from("json"));
    Value::Object(body)
}

fn success(message: &str, body: Map<String, Value>) -> Value {
    with_result(body, 1, message)
}

fn failure(message: &str) -> Value {
    with_result(Map::new(), 0, message)
}

fn object<T: Serialize>(item: &T) -> Map<String, Value> {
    match serde_json::to_value(item) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn single(key: &str, value: impl Into<Value>) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value.into());
    map
}

// --- parameter helpers ---

fn id_param(params: &Params, key: &str) -> Option<u64> {
    params.get(key).and_then(|v| v.trim().parse().ok())
}

/// Ids from `p[ID]` keys.
fn list_ids(params: &Params) -> Vec<u64> {
    let mut ids: Vec<u64> = params
        .keys()
        .filter_map(|key| key.strip_prefix("p[")?.strip_suffix(']')?.parse().ok())
        .collect();
    ids.sort_unstable();
    ids
}

/// Custom fields from `field[%NAME%,0]` keys, keyed by `NAME`.
fn custom_fields(params: &Params) -> BTreeMap<String, String> {
    params
        .iter()
        .filter_map(|(key, value)| {
            let tag = key.strip_prefix("field[%")?.strip_suffix("%,0]")?;
            Some((tag.to_string(), value.clone()))
        })
        .collect()
}

fn selected<'a, T>(items: &'a BTreeMap<u64, T>, params: &Params) -> Vec<&'a T> {
    match params.get("ids").map(String::as_str) {
        None | Some("all") => items.values().collect(),
        Some(ids) => ids
            .split(',')
            .filter_map(|id| id.trim().parse::<u64>().ok())
            .filter_map(|id| items.get(&id))
            .collect(),
    }
}

// --- generic actions ---

fn list<T: Serialize>(items: &BTreeMap<u64, T>, params: &Params) -> Value {
    let rows = selected(items, params);
    if rows.is_empty() {
        return failure("Failed: Nothing is returned");
    }
    let body = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| (i.to_string(), Value::Object(object(row))))
        .collect();
    success("Success: Something is returned", body)
}

fn view<T: Serialize>(items: &BTreeMap<u64, T>, params: &Params) -> Value {
    match id_param(params, "id").and_then(|id| items.get(&id)) {
        Some(item) => success("Success: Something is returned", object(item)),
        None => failure("Failed: Nothing is returned"),
    }
}

fn delete<T>(items: &mut BTreeMap<u64, T>, params: &Params, message: &str) -> Value {
    match id_param(params, "id").and_then(|id| items.remove(&id)) {
        Some(_) => success(message, Map::new()),
        None => failure("Failed: Nothing is returned"),
    }
}

// --- contacts ---

fn contact_add(store: &mut Store, params: &Params) -> Value {
    let Some(email) = params.get("email").filter(|e| e.contains('@')) else {
        return failure("Contact Email Address is not valid.");
    };
    if store.contacts.values().any(|c| &c.email == email) {
        return failure("Contact Email Address already exists in the system.");
    }
    let id = store.next_id();
    let contact = Contact {
        id,
        email: email.clone(),
        first_name: params.get("first_name").cloned().unwrap_or_default(),
        last_name: params.get("last_name").cloned().unwrap_or_default(),
        fields: custom_fields(params),
        lists: list_ids(params),
    };
    store.contacts.insert(id, contact);
    success("Contact added", single("subscriber_id", id))
}

fn apply_update(contact: &mut Contact, params: &Params) {
    if let Some(email) = params.get("email") {
        contact.email = email.clone();
    }
    if let Some(first_name) = params.get("first_name") {
        contact.first_name = first_name.clone();
    }
    if let Some(last_name) = params.get("last_name") {
        contact.last_name = last_name.clone();
    }
    contact.fields.extend(custom_fields(params));
    for list_id in list_ids(params) {
        if !contact.lists.contains(&list_id) {
            contact.lists.push(list_id);
        }
    }
}

fn contact_edit(store: &mut Store, params: &Params) -> Value {
    match id_param(params, "id").and_then(|id| store.contacts.get_mut(&id)) {
        Some(contact) => {
            apply_update(contact, params);
            success("Contact updated", single("subscriber_id", contact.id))
        }
        None => failure("Failed: Nothing is returned"),
    }
}

fn contact_sync(store: &mut Store, params: &Params) -> Value {
    let email = params.get("email");
    let existing = store
        .contacts
        .values_mut()
        .find(|c| Some(&c.email) == email);
    match existing {
        Some(contact) => {
            apply_update(contact, params);
            success("Contact updated", single("subscriber_id", contact.id))
        }
        None => contact_add(store, params),
    }
}

fn contact_view_email(store: &Store, params: &Params) -> Value {
    let email = params.get("email");
    match store.contacts.values().find(|c| Some(&c.email) == email) {
        Some(contact) => success("Success: Something is returned", object(contact)),
        None => failure("Failed: Nothing is returned"),
    }
}

// --- lists ---

fn list_add(store: &mut Store, params: &Params) -> Value {
    let Some(name) = params.get("name").filter(|n| !n.is_empty()) else {
        return failure("List name is required");
    };
    let id = store.next_id();
    store.lists.insert(
        id,
        MailingList {
            id,
            name: name.clone(),
        },
    );
    success("List added", single("id", id))
}

fn list_edit(store: &mut Store, params: &Params) -> Value {
    let Some(list) = id_param(params, "id").and_then(|id| store.lists.get_mut(&id)) else {
        return failure("Failed: Nothing is returned");
    };
    if let Some(name) = params.get("name") {
        list.name = name.clone();
    }
    success("List updated", single("id", list.id))
}

fn list_delete(store: &mut Store, params: &Params) -> Value {
    let Some(id) = id_param(params, "id").filter(|id| store.lists.remove(id).is_some()) else {
        return failure("Failed: Nothing is returned");
    };
    for contact in store.contacts.values_mut() {
        contact.lists.retain(|list_id| *list_id != id);
    }
    success("List deleted", Map::new())
}

// --- campaigns ---

fn campaign_create(store: &mut Store, params: &Params) -> Value {
    let Some(name) = params.get("name").filter(|n| !n.is_empty()) else {
        return failure("Campaign name is required");
    };
    let id = store.next_id();
    let campaign = Campaign {
        id,
        name: name.clone(),
        kind: params.get("type").cloned().unwrap_or_else(|| "single".to_string()),
        status: params.get("status").and_then(|s| s.parse().ok()).unwrap_or(0),
        lists: list_ids(params),
    };
    store.campaigns.insert(id, campaign);
    success("Campaign saved", single("id", id))
}

fn campaign_status(store: &mut Store, params: &Params) -> Value {
    let status = params.get("status").and_then(|s| s.parse::<u8>().ok()).filter(|s| *s <= 6);
    let campaign = id_param(params, "id").and_then(|id| store.campaigns.get_mut(&id));
    match (campaign, status) {
        (Some(campaign), Some(status)) => {
            campaign.status = status;
            success("Campaign status updated", Map::new())
        }
        (None, _) => failure("Failed: Nothing is returned"),
        (Some(_), None) => failure("Campaign status is not valid"),
    }
}

fn campaign_send(store: &Store, params: &Params) -> Value {
    if id_param(params, "id").and_then(|id| store.campaigns.get(&id)).is_none() {
        return failure("Failed: Nothing is returned");
    }
    let email = params.get("email");
    if !store.contacts.values().any(|c| Some(&c.email) == email) {
        return failure("Contact Email Address is not valid.");
    }
    success("Campaign sent", Map::new())
}
