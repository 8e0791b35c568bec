//! Record CRUD handlers. State carries the model and store for one resource.

use crate::error::AppError;
use crate::response::created;
use crate::service::RequestValidator;
use crate::state::RecordState;
use crate::store::Row;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn list(State(state): State<RecordState>) -> Result<Json<Vec<Row>>, AppError> {
    let rows = state.store.all().await?;
    Ok(Json(rows))
}

pub async fn read(
    State(state): State<RecordState>,
    Path(id): Path<String>,
) -> Result<Json<Row>, AppError> {
    let row = state
        .store
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", state.model.name, id)))?;
    Ok(Json(row))
}

pub async fn create(
    State(state): State<RecordState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let row = RequestValidator::conform(&state.model, body)?;
    let id = state.store.create(row).await?;
    Ok(created(id))
}

pub async fn update(
    State(state): State<RecordState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(body) = body?;
    let row = RequestValidator::conform(&state.model, body)?;
    state.store.update(&id, row).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<RecordState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
