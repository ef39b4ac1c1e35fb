use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ID_KEY: &str = "_id";

/// A stored record: the submitted fields plus `_id`.
pub type Record = Map<String, Value>;

/// Records in insertion order.
pub type Db = Arc<RwLock<Vec<Record>>>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    db: Db,
    credentials: Arc<Credentials>,
}

pub fn app() -> Router {
    app_with(Credentials::default())
}

pub fn app_with(credentials: Credentials) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Vec::new())),
        credentials: Arc::new(credentials),
    };
    Router::new()
        .route("/get_records", get(list_records))
        .route("/add_record", post(add_record))
        .route("/update_record/{id}", put(update_record))
        .route("/delete_record/{id}", delete(delete_record))
        .route("/login", post(login))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Credentials::default()).await
}

pub async fn run_with(
    listener: TcpListener,
    credentials: Credentials,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(credentials)).await
}

fn record_id(record: &Record) -> Option<&str> {
    record.get(ID_KEY).and_then(Value::as_str)
}

async fn list_records(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.db.read().await.clone())
}

async fn add_record(
    State(state): State<AppState>,
    Json(mut input): Json<Record>,
) -> (StatusCode, Json<Record>) {
    let id = Uuid::new_v4().simple().to_string();
    input.insert(ID_KEY.to_string(), Value::String(id.clone()));
    state.db.write().await.push(input.clone());
    tracing::debug!(%id, "record added");
    (StatusCode::CREATED, Json(input))
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut input): Json<Record>,
) -> Result<Json<Record>, StatusCode> {
    let mut records = state.db.write().await;
    let record = records
        .iter_mut()
        .find(|r| record_id(r) == Some(id.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    input.insert(ID_KEY.to_string(), Value::String(id));
    *record = input;
    Ok(Json(record.clone()))
}

async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut records = state.db.write().await;
    let position = records
        .iter()
        .position(|r| record_id(r) == Some(id.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    records.remove(position);
    Ok(Json(json!({ "message": "Record deleted" })))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> (StatusCode, Json<Value>) {
    let expected = &state.credentials;
    if input.username == expected.username && input.password == expected.password {
        (StatusCode::OK, Json(json!({ "message": "Login successful" })))
    } else {
        tracing::debug!(username = %input.username, "login rejected");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_credentials() {
        let creds = Credentials::default();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "admin");
    }

    #[test]
    fn credentials_deserialize_from_login_body() {
        let creds: Credentials =
            serde_json::from_str(r#"{"username":"u","password":"p"}"#).unwrap();
        assert_eq!(creds.username, "u");
        assert_eq!(creds.password, "p");
    }

    #[test]
    fn login_body_requires_password() {
        let result: Result<Credentials, _> = serde_json::from_str(r#"{"username":"u"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn record_id_reads_string_ids_only() {
        let mut record = Record::new();
        assert_eq!(record_id(&record), None);
        record.insert(ID_KEY.to_string(), json!(7));
        assert_eq!(record_id(&record), None);
        record.insert(ID_KEY.to_string(), json!("abc"));
        assert_eq!(record_id(&record), Some("abc"));
    }
}
