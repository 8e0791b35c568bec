//! Shared fixtures: in-memory SQLite through the Any driver, sample records, HTTP helpers.
#![allow(dead_code)]

use autocrud::{FieldType, ModelDef, Record};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use tower::ServiceExt;

/// One connection that never idles out, so the in-memory database lives for the whole test.
pub async fn memory_pool() -> AnyPool {
    sqlx::any::install_default_drivers();
    AnyPoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite")
}

pub async fn table_count(pool: &AnyPool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("sqlite_master query")
}

pub async fn row_count(pool: &AnyPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM \"{}\"", table))
        .fetch_one(pool)
        .await
        .expect("row count")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<String>,
    pub title: String,
    pub done: bool,
}

impl Record for Task {
    fn model() -> ModelDef {
        ModelDef::new("Task")
            .field("id", FieldType::Text)
            .field("title", FieldType::Text)
            .field("done", FieldType::Boolean)
    }
}

pub fn task(title: &str, done: bool) -> Task {
    Task {
        id: None,
        title: title.to_string(),
        done,
    }
}

/// Model without a declared id, covering every supported column type.
pub fn ticket_model() -> ModelDef {
    ModelDef::new("Ticket")
        .field("subject", FieldType::Text)
        .field("priority", FieldType::Integer)
        .optional_field("estimate", FieldType::Float)
        .field("urgent", FieldType::Boolean)
        .field("state", FieldType::enumeration(["open", "closed"]))
}

/// Declared SQL type of a column, from SQLite's table_info pragma.
pub async fn column_type(pool: &AnyPool, table: &str, column: &str) -> String {
    sqlx::query_scalar::<_, String>("SELECT type FROM pragma_table_info($1) WHERE name = $2")
        .bind(table)
        .bind(column)
        .fetch_one(pool)
        .await
        .expect("table_info query")
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    match body {
        Some(v) => send_raw(app, method, uri, Some("application/json"), v.to_string()).await,
        None => send_raw(app, method, uri, None, String::new()).await,
    }
}

/// Sends `body` verbatim, with the given content type if any.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let body = Body::from(body);
    let response = app
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
