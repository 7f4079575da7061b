//! User routes.

use super::{parse_id, store_err, to_doc, to_docs};
use crate::error::ApiError;
use crate::query::{ListQuery, RawListParams};
use crate::response::ApiSuccess;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;
use taskdb_core::model::UserPayload;

const NOT_FOUND: &str = "User not found";

/// `GET /api/users` — no default limit, unlike tasks.
pub async fn list(
    State(state): State<AppState>,
    Query(raw): Query<RawListParams>,
) -> Result<ApiSuccess, ApiError> {
    let query = ListQuery::parse(&raw)?;
    let users = state.engine.users().scan_all().map_err(store_err)?;
    let docs = to_docs(&users)?;

    if raw.count {
        return Ok(ApiSuccess::ok("OK", Value::from(query.count_matching(&docs))));
    }
    Ok(ApiSuccess::ok("OK", Value::Array(query.apply(docs))))
}

/// `POST /api/users`
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<ApiSuccess, ApiError> {
    let user = state.engine.create_user(payload)?;
    Ok(ApiSuccess::created("User created", to_doc(&user)?))
}

/// `GET /api/users/{id}` — only `select` is honored.
pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(raw): Query<RawListParams>,
) -> Result<ApiSuccess, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let query = ListQuery::parse(&raw)?;

    let user = state
        .engine
        .users()
        .get(id)
        .map_err(store_err)?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(ApiSuccess::ok("OK", query.project_one(to_doc(&user)?)))
}

/// `PUT /api/users/{id}` — full replace.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UserPayload>,
) -> Result<ApiSuccess, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    let user = state.engine.update_user(id, payload)?;
    Ok(ApiSuccess::ok("User updated", to_doc(&user)?))
}

/// `DELETE /api/users/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess, ApiError> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.engine.delete_user(id)?;
    Ok(ApiSuccess::no_content())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use taskdb_store::Store;
    use taskdb_testkit::payloads::{task_named, user_named, user_with_pending};

    fn state() -> AppState {
        AppState::new(&Store::in_memory())
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let state = state();
        let created = create(State(state.clone()), Json(user_named("Ada", "ada@example.com")))
            .await
            .unwrap();
        assert_eq!(created.status, StatusCode::CREATED);
        let id = created.envelope.data["id"].as_str().unwrap().to_string();

        let fetched = fetch(
            State(state),
            Path(id.clone()),
            Query(RawListParams::default()),
        )
        .await
        .unwrap();
        assert_eq!(fetched.envelope.data["email"], "ada@example.com");
        assert_eq!(fetched.envelope.data["pendingTasks"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn duplicate_email_is_400() {
        let state = state();
        create(State(state.clone()), Json(user_named("Ada", "ada@example.com")))
            .await
            .unwrap();

        let result = create(State(state), Json(user_named("Eve", "ada@example.com"))).await;
        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Validation error: email must be unique");
    }

    #[tokio::test]
    async fn create_with_pending_backfills_tasks() {
        let state = state();
        let task = state.engine.create_task(task_named("orphan")).unwrap();

        let created = create(
            State(state.clone()),
            Json(user_with_pending("Ada", "ada@example.com", vec![task.id])),
        )
        .await
        .unwrap();
        let user_id = created.envelope.data["id"].as_str().unwrap().to_string();

        let task = state.engine.tasks().get(task.id).unwrap().unwrap();
        assert_eq!(task.assigned_user.unwrap().to_string(), user_id);
        assert_eq!(task.assigned_user_name, "Ada");
    }

    #[tokio::test]
    async fn remove_unassigns_tasks() {
        let state = state();
        let created = create(State(state.clone()), Json(user_named("Ada", "ada@example.com")))
            .await
            .unwrap();
        let user_id = created.envelope.data["id"].as_str().unwrap().to_string();

        let mut payload = task_named("t");
        payload.assigned_user = Some(user_id.parse().unwrap());
        let task = state.engine.create_task(payload).unwrap();

        let removed = remove(State(state.clone()), Path(user_id)).await.unwrap();
        assert_eq!(removed.status, StatusCode::NO_CONTENT);

        let task = state.engine.tasks().get(task.id).unwrap().unwrap();
        assert_eq!(task.assigned_user, None);
        assert_eq!(task.assigned_user_name, "unassigned");
    }

    #[tokio::test]
    async fn update_missing_is_404() {
        let result = update(
            State(state()),
            Path(taskdb_store::DocumentId::new().to_string()),
            Json(user_named("Ada", "ada@example.com")),
        )
        .await;
        let err = result.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "User not found");
    }
}
