//! HTTP handlers for the Task API.
//!
//! Each handler validates its input completely before it changes the store,
//! then performs at most one mutation. Path identities that do not parse as
//! integers, including segments that are not valid UTF-8, are answered with
//! 404 without reaching the store. For a known identity the task is looked
//! up before the body is validated, so an unknown task is a 404 whatever
//! the body holds.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde_json::Value;

use super::dto::{
    CreateTaskRequest, SetCompletionRequest, TaskResponse, UpdateTaskRequest, expect_object,
};
use super::error::ApiErrorResponse;
use crate::domain::TaskId;
use crate::infrastructure::{InMemoryTaskStore, TaskStore};

/// A JSON body as handed to handlers: either the parsed value or the reason
/// it could not be read.
pub type JsonBody = Result<Json<Value>, JsonRejection>;

/// The `{id}` path segment, or the reason axum could not decode it.
pub type TaskPath = Result<Path<String>, PathRejection>;

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// Handlers only see the store through the [`TaskStore`] trait.
#[derive(Clone)]
pub struct AppState {
    /// Authoritative task store.
    pub store: Arc<dyn TaskStore + Send + Sync>,
}

impl AppState {
    /// Creates a new `AppState` around an existing store.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Creates a new `AppState` backed by an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryTaskStore::new()))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_task_id(path: TaskPath) -> Result<TaskId, ApiErrorResponse> {
    let Path(segment) = path.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Undecodable task identity");
        ApiErrorResponse::task_not_found()
    })?;
    TaskId::parse(&segment).ok_or_else(|| {
        tracing::debug!(segment, "Unparseable task identity");
        ApiErrorResponse::task_not_found()
    })
}

fn read_body(payload: JsonBody) -> Result<Value, ApiErrorResponse> {
    let Json(body) = payload?;
    Ok(body)
}

// =============================================================================
// POST /tasks
// =============================================================================

/// Creates a new task.
///
/// # Request Body
///
/// ```json
/// { "title": "Buy milk", "dueDate": "2024-05-01" }
/// ```
///
/// # Response
///
/// - **201 Created**: Task created successfully
/// - **400 Bad Request**: Missing or invalid `title`, invalid `dueDate`
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] when validation fails; no task is created.
pub async fn create_task(
    State(state): State<AppState>,
    payload: JsonBody,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErrorResponse> {
    let body = read_body(payload)?;
    let request = CreateTaskRequest::from_json(expect_object(&body)?)?;

    let task = state.store.create(request.title, request.due_date).await;
    tracing::info!(task_id = %task.id, "Created task");

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

// =============================================================================
// GET /tasks
// =============================================================================

/// Lists every task in insertion order.
pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<TaskResponse>> {
    let tasks = state.store.list().await;
    Json(tasks.into_iter().map(TaskResponse::from).collect())
}

// =============================================================================
// GET /tasks/{id}
// =============================================================================

/// Fetches a single task.
///
/// # Errors
///
/// Returns 404 if the identity does not parse or no such task exists.
pub async fn get_task(
    State(state): State<AppState>,
    path: TaskPath,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let id = parse_task_id(path)?;
    let task = state.store.get(id).await?;
    Ok(Json(TaskResponse::from(task)))
}

// =============================================================================
// PATCH /tasks/{id}
// =============================================================================

/// Applies a partial update.
///
/// Only fields present in the body are written. If any present field is
/// invalid, nothing is written.
///
/// # Errors
///
/// - 404 if the identity does not parse or no such task exists
/// - 400 if a present field has the wrong type or `title` is blank
pub async fn update_task(
    State(state): State<AppState>,
    path: TaskPath,
    payload: JsonBody,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let id = parse_task_id(path)?;
    state.store.get(id).await?;
    let body = read_body(payload)?;
    let request = UpdateTaskRequest::from_json(expect_object(&body)?)?;

    let task = state.store.update_partial(id, request.into()).await?;
    tracing::info!(task_id = %task.id, "Updated task");

    Ok(Json(TaskResponse::from(task)))
}

// =============================================================================
// PUT /tasks/{id}
// =============================================================================

/// Sets the completion flag. `title` and `dueDate` in the body are ignored.
///
/// # Errors
///
/// - 404 if the identity does not parse or no such task exists
/// - 400 if `completed` is missing or not a boolean
pub async fn set_task_completion(
    State(state): State<AppState>,
    path: TaskPath,
    payload: JsonBody,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let id = parse_task_id(path)?;
    state.store.get(id).await?;
    let body = read_body(payload)?;
    let request = SetCompletionRequest::from_json(expect_object(&body)?)?;

    let task = state
        .store
        .replace_completion(id, request.completed)
        .await?;
    tracing::info!(task_id = %task.id, completed = task.completed, "Set task completion");

    Ok(Json(TaskResponse::from(task)))
}

// =============================================================================
// DELETE /tasks/{id}
// =============================================================================

/// Deletes a task.
///
/// # Errors
///
/// Returns 404 if the identity does not parse or no such task exists.
pub async fn delete_task(
    State(state): State<AppState>,
    path: TaskPath,
) -> Result<StatusCode, ApiErrorResponse> {
    let id = parse_task_id(path)?;
    state.store.delete(id).await?;
    tracing::info!(task_id = %id, "Deleted task");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// ```json
/// { "status": "healthy", "version": "0.1.0" }
/// ```
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn body(value: Value) -> JsonBody {
        Ok(Json(value))
    }

    fn path(id: impl std::fmt::Display) -> TaskPath {
        Ok(Path(id.to_string()))
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_returns_created() {
        let state = AppState::in_memory();
        let (status, Json(task)) = create_task(State(state), body(json!({"title": "Buy milk"})))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task.id, TaskId::new(1));
        assert!(!task.completed);
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_rejects_missing_title_without_creating() {
        let state = AppState::in_memory();
        let error = create_task(State(state.clone()), body(json!({})))
            .await
            .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error.field.as_deref(), Some("title"));
        assert!(state.store.list().await.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_task_rejects_array_body() {
        let state = AppState::in_memory();
        let error = create_task(State(state), body(json!(["Buy milk"])))
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case("abc")]
    #[case("-1")]
    #[case("99")]
    #[tokio::test]
    async fn test_get_task_not_found(#[case] id: &str) {
        let state = AppState::in_memory();
        state.store.create("x".to_string(), None).await;

        let error = get_task(State(state), path(id))
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_task_invalid_field_applies_nothing() {
        let state = AppState::in_memory();
        let task = state.store.create("Buy milk".to_string(), None).await;

        let error = update_task(
            State(state.clone()),
            path(task.id),
            body(json!({"title": "Renamed", "completed": "yes"})),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(state.store.get(task.id).await.unwrap(), task);
    }

    #[rstest]
    #[case(json!({"completed": "yes"}))]
    #[case(json!("not an object"))]
    #[tokio::test]
    async fn test_update_unknown_task_is_not_found_before_validation(#[case] payload: Value) {
        let state = AppState::in_memory();

        let error = update_task(State(state.clone()), path(7), body(payload.clone()))
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::NOT_FOUND);

        let error = set_task_completion(State(state), path(7), body(payload))
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn test_set_task_completion_ignores_title() {
        let state = AppState::in_memory();
        let task = state.store.create("Buy milk".to_string(), None).await;

        let Json(updated) = set_task_completion(
            State(state),
            path(task.id),
            body(json!({"completed": true, "title": "Ignored"})),
        )
        .await
        .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "Buy milk");
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_task_twice() {
        let state = AppState::in_memory();
        let task = state.store.create("Buy milk".to_string(), None).await;

        let status = delete_task(State(state.clone()), path(task.id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let error = delete_task(State(state), path(task.id))
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[tokio::test]
    async fn test_health_check() {
        let Json(response) = health_check().await;
        assert_eq!(response.status, "healthy");
    }
}
