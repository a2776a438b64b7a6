//! HTTP-level tests for the REST surface, driven through the router with
//! `tower::ServiceExt::oneshot`.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::seed_task;
use todolist::api::{AppState, router};
use todolist::storage::Store;

fn app(store: &Store) -> Router {
    router(AppState::new(store.clone()))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn send_raw(app: Router, method: Method, uri: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap().status()
}

#[rstest]
#[tokio::test]
async fn health_reports_ok() {
    let store = Store::in_memory();
    let (status, body) = send(app(&store), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[rstest]
#[tokio::test]
async fn create_task_requires_description() {
    let store = Store::in_memory();
    let (status, body) = send(app(&store), Method::POST, "/api/tasks", Some(json!({ "code": "A-1" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"][0]["field"], "description");
    assert!(store.list_tasks().await.is_empty());
}

#[rstest]
#[tokio::test]
async fn create_task_fills_defaults() {
    let store = Store::in_memory();
    let body = json!({ "description": "Write report", "project": "Work" });
    let (status, body) = send(app(&store), Method::POST, "/api/tasks", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["description"], "Write report");
    assert_eq!(body["project"], "Work");
    assert_eq!(body["isDone"], false);
    assert_eq!(body["code"], "");
    assert_eq!(body["completeDate"], "");
}

#[rstest]
#[tokio::test]
async fn list_tasks_returns_store_order() {
    let store = Store::in_memory();
    seed_task(&store, "B", "Work", "2024-01-02", false).await;
    seed_task(&store, "A", "Home", "2024-01-01", true).await;

    let (status, body) = send(app(&store), Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body.as_array().unwrap().iter().map(|t| t["code"].as_str().unwrap()).collect();
    assert_eq!(codes, vec!["B", "A"]);
}

#[rstest]
#[tokio::test]
async fn update_merges_partial_body() {
    let store = Store::in_memory();
    let task = seed_task(&store, "A-1", "Work", "2024-01-01", false).await;

    let uri = format!("/api/tasks/{}", task.id);
    let (status, body) = send(app(&store), Method::PUT, &uri, Some(json!({ "isDone": true }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isDone"], true);
    assert_eq!(body["code"], "A-1");
    assert_eq!(body["project"], "Work");
    assert_eq!(body["tasktime"], "01:30");
    assert!(store.find_task(task.id).await.unwrap().is_done);
}

#[rstest]
#[case(Method::PUT, "/api/tasks/99", Some(json!({ "isDone": true })))]
#[case(Method::DELETE, "/api/tasks/99", None)]
#[case(Method::DELETE, "/api/projects/99", None)]
#[tokio::test]
async fn unknown_ids_are_not_found(#[case] method: Method, #[case] uri: &str, #[case] body: Option<Value>) {
    let store = Store::in_memory();
    let (status, body) = send(app(&store), method, uri, body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[rstest]
#[tokio::test]
async fn delete_task_removes_it() {
    let store = Store::in_memory();
    let task = seed_task(&store, "A-1", "Work", "2024-01-01", false).await;

    let uri = format!("/api/tasks/{}", task.id);
    let (status, body) = send(app(&store), Method::DELETE, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted");
    assert!(store.list_tasks().await.is_empty());
}

#[rstest]
#[tokio::test]
async fn create_project_trims_name() {
    let store = Store::in_memory();
    let (status, body) = send(app(&store), Method::POST, "/api/projects", Some(json!({ "name": "  Work " }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Work");
    assert_eq!(body["id"], 1);
}

#[rstest]
#[case(json!({}))]
#[case(json!({ "name": "   " }))]
#[tokio::test]
async fn create_project_rejects_missing_name(#[case] body: Value) {
    let store = Store::in_memory();
    let (status, _) = send(app(&store), Method::POST, "/api/projects", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.list_projects().await.is_empty());
}

#[rstest]
#[tokio::test]
async fn delete_project_orphans_its_tasks() {
    let store = Store::in_memory();
    let work = store.create_project("Work".into()).await.unwrap();
    store.create_project("Home".into()).await.unwrap();
    let a = seed_task(&store, "A", "Work", "2024-01-01", false).await;
    let b = seed_task(&store, "B", "Home", "2024-01-01", false).await;
    let c = seed_task(&store, "C", "Work", "2024-01-02", true).await;

    let uri = format!("/api/projects/{}", work.id);
    let (status, body) = send(app(&store), Method::DELETE, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted");
    assert_eq!(store.find_task(a.id).await.unwrap().project, "");
    assert_eq!(store.find_task(b.id).await.unwrap().project, "Home");
    let c = store.find_task(c.id).await.unwrap();
    assert_eq!(c.project, "");
    assert!(c.is_done);
    assert_eq!(store.list_tasks().await.len(), 3);
    let names: Vec<String> = store.list_projects().await.into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Home"]);
}

#[rstest]
#[case(Method::POST, "/api/tasks", "{ not json")]
#[case(Method::POST, "/api/projects", "[1, 2")]
#[case(Method::PUT, "/api/tasks/1", "{\"isDone\": \"yes\"}")]
#[tokio::test]
async fn malformed_bodies_are_bad_requests(#[case] method: Method, #[case] uri: &str, #[case] body: &str) {
    let store = Store::in_memory();
    seed_task(&store, "A", "Work", "2024-01-01", false).await;
    assert_eq!(send_raw(app(&store), method, uri, body).await, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let store = Store::in_memory();
    let (status, body) = send(app(&store), Method::DELETE, "/api/tasks/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[rstest]
#[case("2:05")]
#[case("02:5")]
#[case("1h30")]
#[tokio::test]
async fn malformed_tasktime_is_rejected(#[case] tasktime: &str) {
    let store = Store::in_memory();
    let body = json!({ "description": "x", "tasktime": tasktime });
    let (status, body) = send(app(&store), Method::POST, "/api/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "tasktime");
}
