//! Task routes.

use super::{parse_id, store_err, to_doc, to_docs};
use crate::error::ApiError;
use crate::query::{ListQuery, RawListParams};
use crate::response::ApiSuccess;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;
use taskdb_core::model::TaskPayload;

/// Page size applied to task listings when the caller gives no limit.
const DEFAULT_LIMIT: usize = 100;

const NOT_FOUND: &str = "Task not found";

/// `GET /api/tasks`
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<RawListParams>,
) -> Result<ApiSuccess, ApiError> {
    let mut query = ListQuery::parse(&raw)?;
    let tasks = state.engine.tasks().scan_all().map_err(store_err)?;
    let docs = to_docs(&tasks)?;

    if raw.count {
        return Ok(ApiSuccess::ok("OK", Value::from(query.count_matching(&docs))));
    }

    if query.limit.is_none() {
        query.limit = Some(DEFAULT_LIMIT);
    }
    Ok(ApiSuccess::ok("OK", Value::Array(query.apply(docs))))
}

/// `POST /api/tasks`
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> Result<ApiSuccess, ApiError> {
    let task = state.engine.create_task(payload)?;
    Ok(ApiSuccess::created("Task created", to_doc(&task)?))
}

/// `GET /api/tasks/{id}` — only `select` is honored.
pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(raw): Query<RawListParams>,
) -> Result<ApiSuccess, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let query = ListQuery::parse(&raw)?;

    let task = state
        .engine
        .tasks()
        .get(id)
        .map_err(store_err)?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(ApiSuccess::ok("OK", query.project_one(to_doc(&task)?)))
}

/// `PUT /api/tasks/{id}` — full replace.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TaskPayload>,
) -> Result<ApiSuccess, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let task = state.engine.update_task(id, payload)?;
    Ok(ApiSuccess::ok("Task updated", to_doc(&task)?))
}

/// `DELETE /api/tasks/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.engine.delete_task(id)?;
    Ok(ApiSuccess::no_content())
}
