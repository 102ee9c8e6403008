use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// A message body stored by `POST /messages`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: usize,
    pub body: String,
}

pub type Db = Arc<RwLock<Vec<Message>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/hello", get(hello))
        .route("/status/{code}", get(status))
        .route("/query", get(query))
        .route("/headers", get(headers))
        .route("/multiline", get(multiline))
        .route("/echo", post(echo))
        .route("/form", post(form))
        .route("/messages", get(list_messages).post(create_message))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn hello() -> &'static str {
    "Hello"
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

async fn query(RawQuery(query): RawQuery) -> String {
    query.unwrap_or_default()
}

async fn headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    Json(
        headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
    )
}

async fn multiline() -> &'static str {
    "first line\r\nsecond line"
}

async fn echo(body: String) -> String {
    body
}

async fn form(Form(fields): Form<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    Json(fields)
}

async fn list_messages(State(db): State<Db>) -> Json<Vec<Message>> {
    Json(db.read().await.clone())
}

async fn create_message(State(db): State<Db>, body: String) -> (StatusCode, Json<Message>) {
    let mut messages = db.write().await;
    let message = Message {
        id: messages.len() + 1,
        body,
    };
    messages.push(message.clone());
    (StatusCode::CREATED, Json(message))
}
