//! End-to-end tests of the task endpoints against the in-memory repository

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use mocks::{alice_key, alice_task, assert_task_equals, MockTaskRepository, TaskBuilder};
use std::sync::Arc;
use task_core::{Task, TaskError, TaskRepository};
use task_http::TaskServer;
use tower::ServiceExt;

struct TestApp {
    repo: MockTaskRepository,
    static_dir: tempfile::TempDir,
}

impl TestApp {
    fn new() -> Self {
        let static_dir = tempfile::tempdir().unwrap();
        std::fs::write(static_dir.path().join("to_do.html"), "<h1>To do</h1>").unwrap();
        std::fs::write(static_dir.path().join("app.js"), "console.log('hi');").unwrap();
        Self {
            repo: MockTaskRepository::new(),
            static_dir,
        }
    }

    fn router(&self) -> Router {
        TaskServer::new(Arc::new(self.repo.clone()), self.static_dir.path()).create_router()
    }

    async fn request(&self, method: &str, uri: &str, body: &str) -> Response {
        self.router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn call(&self, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, body_text(response).await)
    }
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}

fn assert_cors(response: &Response, allowed: &str) {
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], allowed);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
}

#[tokio::test]
async fn test_add_fetch_update_delete_scenario() {
    let app = TestApp::new();

    let (status, body) = app
        .call(
            "POST",
            "/add",
            r#"{"name":"alice","date":"2024-01-01","tasks":["buy milk","walk dog"]}"#,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"name":"alice","date":"2024-01-01","tasks":["buy milk","walk dog"]}"#
    );

    let (status, body) = app.call("GET", "/fetch?name=alice&date=2024-01-01", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"["buy milk","walk dog"]"#);

    let (status, _) = app
        .call(
            "PUT",
            "/update",
            r#"{"name":"alice","date":"2024-01-01","tasks":["buy bread"]}"#,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.call("GET", "/fetch?name=alice&date=2024-01-01", "").await;
    assert_eq!(body, r#"["buy bread"]"#);

    let (status, body) = app.call("DELETE", "/delete?name=alice&date=2024-01-01", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Task deleted successfully");

    let (_, body) = app.call("GET", "/fetch?name=alice&date=2024-01-01", "").await;
    assert_eq!(body, "[]");

    let (status, _) = app.call("DELETE", "/delete?name=alice&date=2024-01-01", "").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_json_responses_are_typed() {
    let app = TestApp::new();
    let response = app.request("GET", "/fetch?name=nobody&date=2024-01-01", "").await;
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn test_body_decoding_ignores_content_type() {
    let app = TestApp::new();
    let response = app
        .router()
        .oneshot(
            Request::post("/add")
                .header(header::CONTENT_TYPE, "text/plain")
                .body(Body::from(r#"{"name":"bob","date":"2024-02-02","tasks":[]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.repo.rows().len(), 1);

    let echoed: Task = serde_json::from_str(&body_text(response).await).unwrap();
    assert_task_equals(&echoed, &Task::new("bob", "2024-02-02", vec![]));
}

#[tokio::test]
async fn test_every_endpoint_response_carries_cors_headers() {
    let app = TestApp::new();
    let cases = [
        ("POST", "/add", r#"{"name":"a","date":"b"}"#, "POST"),
        ("POST", "/add", "not json", "POST"),
        ("OPTIONS", "/add", "", "POST"),
        ("GET", "/fetch?name=a&date=b", "", "GET"),
        ("GET", "/fetch", "", "GET"),
        ("PATCH", "/fetch", "", "GET"),
        ("PUT", "/update", r#"{"name":"a","date":"b"}"#, "PUT"),
        ("GET", "/update", "", "PUT"),
        ("DELETE", "/delete?name=a&date=b", "", "DELETE"),
        ("OPTIONS", "/delete", "", "DELETE"),
    ];

    for (method, uri, body, allowed) in cases {
        let response = app.request(method, uri, body).await;
        assert_cors(&response, allowed);
    }
}

#[tokio::test]
async fn test_missing_key_message() {
    let app = TestApp::new();
    let (status, body) = app.call("DELETE", "/delete?name=alice", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Missing name or date");
    app.repo.assert_untouched();
}

#[tokio::test]
async fn test_subtask_with_delimiter_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .call("POST", "/add", r#"{"name":"a","date":"b","tasks":["eggs, milk"]}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("must not contain ','"), "got: {body}");
    app.repo.assert_untouched();
}

#[tokio::test]
async fn test_single_empty_subtask_is_rejected() {
    let app = TestApp::new();
    let (status, _) = app
        .call("POST", "/add", r#"{"name":"alice","date":"2024-01-01","tasks":[""]}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call("PUT", "/update", r#"{"name":"alice","date":"2024-01-01","tasks":[""]}"#)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    app.repo.assert_untouched();
}

#[tokio::test]
async fn test_empty_subtasks_among_others_fetch_back() {
    let app = TestApp::new();
    let (status, _) = app
        .call("POST", "/add", r#"{"name":"alice","date":"2024-01-01","tasks":["","x",""]}"#)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.call("GET", "/fetch?name=alice&date=2024-01-01", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"["","x",""]"#);
}

#[tokio::test]
async fn test_null_subtasks_are_stored_as_empty() {
    let app = TestApp::new();
    let (status, body) = app
        .call("POST", "/add", r#"{"name":"alice","date":"2024-01-01","tasks":null}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"name":"alice","date":"2024-01-01","tasks":[]}"#);

    let (_, body) = app.call("GET", "/fetch?name=alice&date=2024-01-01", "").await;
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_oversized_body_is_payload_too_large() {
    let app = TestApp::new();
    let filler = "x".repeat(3 * 1024 * 1024);
    let body = format!(r#"{{"name":"alice","date":"2024-01-01","tasks":["{filler}"]}}"#);

    let response = app.request("POST", "/add", &body).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_cors(&response, "POST");
    app.repo.assert_untouched();
}

#[tokio::test]
async fn test_body_above_log_summary_size_is_still_handled() {
    let app = TestApp::new();
    let filler = "x".repeat(100 * 1024);
    let body = format!(r#"{{"name":"alice","date":"2024-01-01","tasks":["{filler}"]}}"#);

    let (status, _) = app.call("POST", "/add", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.repo.rows()[0].task.len(), filler.len());
}

#[tokio::test]
async fn test_storage_failure_returns_driver_message() {
    let app = TestApp::new();
    app.repo
        .inject_error(TaskError::Storage("relation \"tasks\" does not exist".into()));

    let response = app.request("GET", "/fetch?name=alice&date=2024-01-01", "").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response, "GET");
    assert_eq!(body_text(response).await, "relation \"tasks\" does not exist");
}

#[tokio::test]
async fn test_fetch_aggregates_duplicate_rows() {
    let app = TestApp::new();
    app.repo.insert(&alice_task()).await.unwrap();
    app.repo
        .insert(&TaskBuilder::new().with_name("alice").with_subtask("pay rent").build())
        .await
        .unwrap();

    let (_, body) = app.call("GET", "/fetch?name=alice&date=2024-01-01", "").await;
    assert_eq!(body, r#"["buy milk","call bob","pay rent"]"#);
}

#[tokio::test]
async fn test_update_of_missing_key_is_silent() {
    let app = TestApp::new();
    let (status, _) = app
        .call("PUT", "/update", r#"{"name":"ghost","date":"2024-01-01","tasks":["x"]}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.repo.rows().is_empty());
    assert!(app.repo.fetch_by_key(&alice_key()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new();
    let (status, body) = app.call("GET", "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_static_files() {
    let app = TestApp::new();

    let (status, body) = app.call("GET", "/", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>To do</h1>");

    let (status, body) = app.call("GET", "/static/app.js", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log('hi');");

    let (status, _) = app.call("GET", "/static/missing.css", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call("GET", "/unknown", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_landing_page_is_not_found() {
    let app = TestApp::new();
    std::fs::remove_file(app.static_dir.path().join("to_do.html")).unwrap();

    let (status, _) = app.call("GET", "/", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
