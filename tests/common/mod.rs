//! Shared helpers for the integration tests.
//!
//! Each integration test file is its own crate, so helpers used by only one
//! of them would otherwise warn as dead code.

#![allow(dead_code)]

use tokio::net::TcpListener;

use todolist::api::{AppState, router};
use todolist::client::ApiClient;
use todolist::models::{Task, TaskPatch};
use todolist::storage::Store;

/// Serves a fresh in-memory store on an ephemeral port.
///
/// Returns a client pointed at its `/api` and the store itself, so tests can
/// seed or inspect data without going through HTTP.
pub async fn spawn_server() -> (ApiClient, Store) {
    let store = Store::in_memory();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let address = listener.local_addr().expect("local address");
    let app = router(AppState::new(store.clone()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    (ApiClient::new(format!("http://{address}/api")), store)
}

/// Builds a full task body.
pub fn task_patch(code: &str, project: &str, date: &str, is_done: bool) -> TaskPatch {
    TaskPatch {
        code: Some(code.to_string()),
        description: Some(format!("{code} description")),
        tasktime: Some("01:30".to_string()),
        project: Some(project.to_string()),
        complete_date: Some(date.to_string()),
        is_done: Some(is_done),
    }
}

/// Inserts a task directly into the store.
pub async fn seed_task(store: &Store, code: &str, project: &str, date: &str, is_done: bool) -> Task {
    store
        .create_task(task_patch(code, project, date, is_done))
        .await
        .expect("seed task")
}
