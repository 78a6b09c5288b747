//! In-memory stand-in for the KwikDesk platform API.
//!
//! Serves the five client endpoints with the same headers, bodies and
//! visibility rules the client relies on: tokens are minted per app name,
//! messages belong to the token that posted them, private messages are
//! listed by `/channel` but never returned by `/search`.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: Uuid,
    pub content: String,
    pub delete: i64,
    pub private: bool,
    pub created_at: u64,
}

impl StoredMessage {
    fn expired(&self, now: u64) -> bool {
        self.delete >= 0 && self.created_at.saturating_add(self.delete as u64) < now
    }
}

#[derive(Deserialize)]
pub struct NewMessage {
    pub content: String,
    pub delete: i64,
    #[serde(default)]
    pub private: bool,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Default)]
pub struct Platform {
    /// token -> app name
    pub tokens: HashMap<String, String>,
    /// token -> messages posted with it
    pub messages: HashMap<String, Vec<StoredMessage>>,
}

pub type Db = Arc<RwLock<Platform>>;

type Reply = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Platform::default()));
    Router::new()
        .route("/token", post(create_token))
        .route("/messages", post(create_message))
        .route("/channel", get(channel))
        .route("/search", get(search))
        .route("/server-time", get(server_time))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn failure(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "error": message })))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Resolve the `X-API-Token` header to a token the platform issued.
async fn authorize(db: &Db, headers: &HeaderMap) -> Result<String, Reply> {
    let token = header(headers, "x-api-token")
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "missing X-API-Token header"))?;
    if db.read().await.tokens.contains_key(token) {
        Ok(token.to_string())
    } else {
        Err(failure(StatusCode::UNAUTHORIZED, "invalid token"))
    }
}

async fn create_token(State(db): State<Db>, headers: HeaderMap) -> Result<Reply, Reply> {
    let app_name = header(&headers, "x-appname")
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "missing X-Appname header"))?;
    let token = Uuid::new_v4().to_string();
    db.write()
        .await
        .tokens
        .insert(token.clone(), app_name.to_string());
    info!("issued token for {app_name}");
    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}

async fn create_message(
    State(db): State<Db>,
    headers: HeaderMap,
    input: Result<Json<NewMessage>, JsonRejection>,
) -> Result<Reply, Reply> {
    let token = authorize(&db, &headers).await?;
    let Json(input) =
        input.map_err(|rejection| failure(rejection.status(), &rejection.body_text()))?;
    let message = StoredMessage {
        id: Uuid::new_v4(),
        content: input.content,
        delete: input.delete,
        private: input.private,
        created_at: now_secs(),
    };
    db.write()
        .await
        .messages
        .entry(token)
        .or_default()
        .push(message.clone());
    Ok((StatusCode::CREATED, Json(json!(message))))
}

async fn channel(State(db): State<Db>, headers: HeaderMap) -> Result<Reply, Reply> {
    let token = authorize(&db, &headers).await?;
    let now = now_secs();
    let platform = db.read().await;
    let results: Vec<&StoredMessage> = platform
        .messages
        .get(&token)
        .map(|all| all.iter().filter(|m| !m.expired(now)).collect())
        .unwrap_or_default();
    Ok((StatusCode::OK, Json(json!({ "results": results }))))
}

async fn search(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Reply, Reply> {
    let token = authorize(&db, &headers).await?;
    let term = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "missing search term"))?;
    let now = now_secs();
    let platform = db.read().await;
    let results: Vec<&StoredMessage> = platform
        .messages
        .get(&token)
        .map(|all| {
            all.iter()
                .filter(|m| !m.private && !m.expired(now) && m.content.contains(&term))
                .collect()
        })
        .unwrap_or_default();
    Ok((StatusCode::OK, Json(json!({ "results": results }))))
}

async fn server_time(State(db): State<Db>, headers: HeaderMap) -> Result<Reply, Reply> {
    authorize(&db, &headers).await?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Ok((
        StatusCode::OK,
        Json(json!({
            "timestamp": now.as_secs(),
            "milliseconds": now.as_millis() as u64,
        })),
    ))
}
