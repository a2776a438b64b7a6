//! `/api/tasks` handlers.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use super::error::ApiErrorResponse;
use super::validation::{validate_new_task, validate_task_patch};
use super::{AppState, MessageResponse};
use crate::models::{Task, TaskPatch};

/// `GET /tasks`: the whole collection in store order.
pub async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.store.list_tasks().await)
}

/// `POST /tasks`: 201 with the created task, 400 on a malformed body.
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiErrorResponse> {
    let Json(patch) = body?;
    validate_new_task(&patch)?;

    let task = state.store.create_task(patch).await?;
    tracing::info!(id = task.id, project = %task.project, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/{id}`: merges the body into the stored task. Unknown ids are 404.
pub async fn update_task(
    id: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
    body: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<Task>, ApiErrorResponse> {
    let Path(id) = id?;
    let Json(patch) = body?;
    validate_task_patch(&patch)?;

    let task = state.store.update_task(id, patch).await?;
    tracing::info!(id, is_done = task.is_done, "task updated");
    Ok(Json(task))
}

/// `DELETE /tasks/{id}`.
pub async fn delete_task(
    id: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiErrorResponse> {
    let Path(id) = id?;
    state.store.delete_task(id).await?;
    tracing::info!(id, "task deleted");
    Ok(Json(MessageResponse::new("Task deleted")))
}
