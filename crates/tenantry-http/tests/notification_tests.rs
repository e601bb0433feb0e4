//! Tests for the record notification step of `POST /tasks`

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tenantry_http::runtime::{AppState, ServerConfig, ServerConfigBuilder, router};
use tenantry_notify::NotifierConfig;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, tasks_file: std::path::PathBuf) -> ServerConfig {
    ServerConfigBuilder::new()
        .tasks_file(tasks_file)
        .notifier(
            NotifierConfig::new(server.uri())
                .credentials("svc", "secret")
                .cabinet_id("cab-1")
                .timeout(Duration::from_secs(2)),
        )
        .build()
        .unwrap()
}

fn app_for(config: &ServerConfig) -> Router {
    let state = AppState::from_config(config).unwrap();
    router(state, config)
}

fn post_task(tenant: &str, description: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/tasks")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Tenant-ID", tenant)
        .body(Body::from(
            serde_json::json!({ "description": description }).to_string(),
        ))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_created_task_is_announced_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api2/Docuware/add-record"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&config_for(&server, dir.path().join("tasks.json")));

    let response = app.oneshot(post_task("T1", "Invoice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_failed_notification_keeps_stored_task() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let tasks_file = dir.path().join("tasks.json");
    let app = app_for(&config_for(&server, tasks_file.clone()));

    let response = app
        .clone()
        .oneshot(post_task("T1", "Invoice"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["error"], "notification_failed");
    let task_id = json["details"]["task_id"].as_str().unwrap().to_string();
    assert!(!json["message"].as_str().unwrap().contains("boom"));

    let list = Request::builder()
        .uri("/tasks")
        .header("X-Tenant-ID", "T1")
        .body(Body::empty())
        .unwrap();
    let listed = body_json(app.oneshot(list).await.unwrap()).await;
    assert_eq!(listed[0]["id"], task_id);

    let on_disk: Value = serde_json::from_slice(&std::fs::read(&tasks_file).unwrap()).unwrap();
    assert_eq!(on_disk[0]["description"], "Invoice");
}

#[tokio::test]
async fn test_update_does_not_notify() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = app_for(&config_for(&server, dir.path().join("tasks.json")));

    let created = body_json(
        app.clone()
            .oneshot(post_task("T1", "Invoice"))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let update = Request::builder()
        .method("PUT")
        .uri(format!("/tasks/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Tenant-ID", "T1")
        .body(Body::from(r#"{"description":"Invoice v2"}"#))
        .unwrap();
    let response = app.oneshot(update).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
