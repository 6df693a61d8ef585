#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use task_manager_api::{app_router, config::AppConfig, db, AppState};
use tempfile::TempDir;
use tower::ServiceExt;
use validator::Validate;

pub const TEST_JWT_SECRET: &str =
    "Kq81vZt0pWf3LmNc6xR2yUe9HbJs5Ga7TdQ4oVi1wXkE8nMr0ZlCuPy3BhFjDg6sA";
pub const TEST_PASSWORD: &str = "s3cret-pass";

/// Helper harness for spinning up the full router backed by a throwaway SQLite file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = dir.path().join("taskboard_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            TEST_JWT_SECRET.to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.validate().expect("test configuration must pass validation");

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());

        Self {
            router,
            state,
            _dir: dir,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Post an urlencoded form, as the board pages do.
    pub async fn post_form(&self, uri: &str, form: &str) -> Response {
        self.send_raw(Method::POST, uri, "application/x-www-form-urlencoded", form)
            .await
    }

    /// Send `body` verbatim with the given content type.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: &str,
    ) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Request and decode the JSON body, asserting the status first.
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        expected: StatusCode,
    ) -> Value {
        let response = self.request(method, uri, body).await;
        assert_status(response, expected).await
    }

    pub async fn create_user(&self, username: &str) -> Value {
        self.json(
            Method::POST,
            "/api/users",
            Some(json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": TEST_PASSWORD,
                "fullName": format!("{} Tester", username),
            })),
            StatusCode::CREATED,
        )
        .await
    }

    pub async fn create_task(&self, title: &str, created_by: i64) -> Value {
        self.json(
            Method::POST,
            "/api/tasks",
            Some(json!({
                "title": title,
                "dueDate": "2024-06-01",
                "createdById": created_by,
            })),
            StatusCode::CREATED,
        )
        .await
    }

    pub async fn create_tag(&self, name: &str) -> Value {
        self.json(
            Method::POST,
            "/api/tags",
            Some(json!({ "name": name })),
            StatusCode::CREATED,
        )
        .await
    }

    pub async fn create_category(&self, name: &str) -> Value {
        self.json(
            Method::POST,
            "/api/categories",
            Some(json!({ "name": name, "color": "#5B8DEF" })),
            StatusCode::CREATED,
        )
        .await
    }

    pub async fn activity(&self, task_id: i64) -> Vec<Value> {
        let entries = self
            .json(
                Method::GET,
                &format!("/api/tasks/{}/activity", task_id),
                None,
                StatusCode::OK,
            )
            .await;
        entries.as_array().cloned().unwrap_or_default()
    }
}

pub fn id_of(value: &Value, field: &str) -> i64 {
    value[field]
        .as_i64()
        .unwrap_or_else(|| panic!("missing numeric {} in {}", field, value))
}

/// Reads the whole body as JSON; an empty body becomes `Value::Null`.
pub async fn body_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse response body")
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn assert_status(response: Response, expected: StatusCode) -> Value {
    let status = response.status();
    let body = body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {}", body);
    body
}
