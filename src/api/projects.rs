//! `/api/projects` handlers.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use super::error::ApiErrorResponse;
use super::validation::validate_new_project;
use super::{AppState, MessageResponse};
use crate::models::{NewProject, Project};

/// `GET /projects`.
pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<Project>> {
    Json(state.store.list_projects().await)
}

/// `POST /projects`: 201 with the created project.
pub async fn create_project(
    State(state): State<AppState>,
    body: Result<Json<NewProject>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiErrorResponse> {
    let Json(body) = body?;
    let name = validate_new_project(body)?;

    let project = state.store.create_project(name).await?;
    tracing::info!(id = project.id, name = %project.name, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// `DELETE /projects/{id}`: removes the project and clears it from its tasks
/// in the same store transaction.
pub async fn delete_project(
    id: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiErrorResponse> {
    let Path(id) = id?;
    let (project, orphaned) = state.store.delete_project(id).await?;
    tracing::info!(id, name = %project.name, orphaned, "project deleted");
    Ok(Json(MessageResponse::new("Project deleted")))
}
