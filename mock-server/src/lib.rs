//! In-memory stand-in for the SendGrid newsletter list API.
//!
//! Serves the same form-encoded POST endpoints under `/api/newsletter/lists/`
//! and answers with the same JSON shapes, including the service's habit of
//! reporting failures as an `error` field inside a 200 response.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{extract::State, routing::post, Form, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_USER: &str = "mock-user";
pub const DEFAULT_KEY: &str = "mock-key";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipient {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListRecord {
    pub id: u64,
    pub list: String,
}

#[derive(Clone, Debug)]
pub struct Credentials {
    pub user: String,
    pub key: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            key: DEFAULT_KEY.to_string(),
        }
    }
}

struct StoredList {
    id: u64,
    recipients: Vec<Recipient>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    lists: BTreeMap<String, StoredList>,
}

pub type Db = Arc<RwLock<Store>>;
type Fields = HashMap<String, String>;
type Reply = Result<Json<Value>, Json<Value>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    credentials: Arc<Credentials>,
}

pub fn app(credentials: Credentials) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        credentials: Arc::new(credentials),
    };
    Router::new()
        .route("/api/newsletter/lists/add.json", post(add_list))
        .route("/api/newsletter/lists/delete.json", post(delete_list))
        .route("/api/newsletter/lists/get.json", post(get_lists))
        .route("/api/newsletter/lists/email/add.json", post(add_recipient))
        .route("/api/newsletter/lists/email/delete.json", post(delete_recipient))
        .route("/api/newsletter/lists/email/get.json", post(get_recipients))
        .route("/api/newsletter/lists/email/count.json", post(count_recipients))
        .with_state(state)
}

pub async fn run(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    axum::serve(listener, app(credentials)).await
}

fn error(msg: impl Into<String>) -> Json<Value> {
    Json(json!({ "error": msg.into() }))
}

fn success() -> Json<Value> {
    Json(json!({ "message": "success" }))
}

/// The real service reports a bad key inside a 200 response.
fn authorize(state: &AppState, fields: &Fields) -> Result<(), Json<Value>> {
    let user = fields.get("api_user").map(String::as_str);
    let key = fields.get("api_key").map(String::as_str);
    if user == Some(state.credentials.user.as_str()) && key == Some(state.credentials.key.as_str()) {
        Ok(())
    } else {
        Err(error("Invalid key"))
    }
}

fn required<'a>(fields: &'a Fields, name: &str) -> Result<&'a str, Json<Value>> {
    fields
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| error(format!("Missing required parameter: {name}")))
}

fn missing_list(name: &str) -> Json<Value> {
    error(format!("{name} does not exist"))
}

async fn add_list(State(state): State<AppState>, Form(fields): Form<Fields>) -> Reply {
    authorize(&state, &fields)?;
    let name = required(&fields, "list")?;
    let mut store = state.db.write().await;
    if store.lists.contains_key(name) {
        return Err(error(format!("{name} already exists")));
    }
    store.next_id += 1;
    let id = store.next_id;
    store.lists.insert(
        name.to_string(),
        StoredList {
            id,
            recipients: Vec::new(),
        },
    );
    Ok(success())
}

async fn delete_list(State(state): State<AppState>, Form(fields): Form<Fields>) -> Reply {
    authorize(&state, &fields)?;
    let name = required(&fields, "list")?;
    let mut store = state.db.write().await;
    store.lists.remove(name).ok_or_else(|| missing_list(name))?;
    Ok(success())
}

async fn get_lists(State(state): State<AppState>, Form(fields): Form<Fields>) -> Reply {
    authorize(&state, &fields)?;
    let store = state.db.read().await;
    let filter = fields.get("list").filter(|name| !name.is_empty());
    let records: Vec<ListRecord> = store
        .lists
        .iter()
        .filter(|(name, _)| filter.map_or(true, |f| f == *name))
        .map(|(name, stored)| ListRecord {
            id: stored.id,
            list: name.clone(),
        })
        .collect();
    if let Some(name) = filter {
        if records.is_empty() {
            return Err(error(format!("the title(s) '{name}' do not exist")));
        }
    }
    Ok(Json(json!(records)))
}

async fn add_recipient(State(state): State<AppState>, Form(fields): Form<Fields>) -> Reply {
    authorize(&state, &fields)?;
    let name = required(&fields, "list")?;
    let data = required(&fields, "data")?;
    let recipient: Recipient =
        serde_json::from_str(data).map_err(|_| error("Invalid JSON in data"))?;
    let mut store = state.db.write().await;
    let stored = store.lists.get_mut(name).ok_or_else(|| missing_list(name))?;
    let inserted = if stored.recipients.iter().any(|r| r.email == recipient.email) {
        0
    } else {
        stored.recipients.push(recipient);
        1
    };
    Ok(Json(json!({ "inserted": inserted })))
}

async fn delete_recipient(State(state): State<AppState>, Form(fields): Form<Fields>) -> Reply {
    authorize(&state, &fields)?;
    let name = required(&fields, "list")?;
    let email = required(&fields, "email[]")?;
    let mut store = state.db.write().await;
    let stored = store.lists.get_mut(name).ok_or_else(|| missing_list(name))?;
    let before = stored.recipients.len();
    stored.recipients.retain(|r| r.email != email);
    Ok(Json(json!({ "removed": before - stored.recipients.len() })))
}

async fn get_recipients(State(state): State<AppState>, Form(fields): Form<Fields>) -> Reply {
    authorize(&state, &fields)?;
    let name = required(&fields, "list")?;
    let store = state.db.read().await;
    let stored = store.lists.get(name).ok_or_else(|| missing_list(name))?;
    let filter = fields.get("email").filter(|email| !email.is_empty());
    let recipients: Vec<&Recipient> = stored
        .recipients
        .iter()
        .filter(|r| filter.map_or(true, |f| *f == r.email))
        .collect();
    Ok(Json(json!(recipients)))
}

async fn count_recipients(State(state): State<AppState>, Form(fields): Form<Fields>) -> Reply {
    authorize(&state, &fields)?;
    let name = required(&fields, "list")?;
    let store = state.db.read().await;
    let stored = store.lists.get(name).ok_or_else(|| missing_list(name))?;
    Ok(Json(json!({ "count": stored.recipients.len() })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState {
            db: Arc::new(RwLock::new(Store::default())),
            credentials: Arc::new(Credentials::default()),
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn list_record_serializes_name_as_list() {
        let json = serde_json::to_value(ListRecord {
            id: 3,
            list: "weekly".to_string(),
        })
        .unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["list"], "weekly");
    }

    #[test]
    fn recipient_name_is_optional() {
        let r: Recipient = serde_json::from_str(r#"{"email":"a@example.com"}"#).unwrap();
        assert_eq!(r.name, "");
    }

    #[test]
    fn authorize_accepts_matching_credentials() {
        let f = fields(&[("api_user", DEFAULT_USER), ("api_key", DEFAULT_KEY)]);
        assert!(authorize(&state(), &f).is_ok());
    }

    #[test]
    fn authorize_rejects_wrong_key() {
        let f = fields(&[("api_user", DEFAULT_USER), ("api_key", "nope")]);
        let Json(body) = authorize(&state(), &f).unwrap_err();
        assert_eq!(body["error"], "Invalid key");
    }

    #[test]
    fn required_rejects_blank_values() {
        let f = fields(&[("list", "")]);
        let Json(body) = required(&f, "list").unwrap_err();
        assert_eq!(body["error"], "Missing required parameter: list");
    }
}
