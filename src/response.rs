//! Response bodies that are not plain records.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Body returned by POST: the id assigned to the new record.
#[derive(Debug, Serialize)]
pub struct CreatedBody {
    pub uuid: String,
}

pub fn created(id: String) -> (StatusCode, Json<CreatedBody>) {
    (StatusCode::CREATED, Json(CreatedBody { uuid: id }))
}
