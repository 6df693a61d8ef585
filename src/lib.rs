//! Task Manager API Library
//!
//! Multi-user task board: users, tasks, categories, tags, assignments,
//! attachment metadata and activity history, exposed as a JSON REST API and a
//! small server-rendered UI.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;
pub mod web;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<config::AppConfig>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), &config);
        Self {
            db,
            config: Arc::new(config),
            services,
        }
    }
}

/// REST API, board pages and Swagger UI with request ids, HTTP tracing and
/// request logging applied. CORS is left to the binary.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::api_routes())
        .merge(web::web_routes())
        .with_state(state)
        .merge(openapi::swagger_ui())
        .layer(axum::middleware::from_fn(request_logging_middleware))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
}

// Request logging middleware
async fn request_logging_middleware(
    request: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    ::tracing::debug!(method = %method, uri = %uri, "Incoming request");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    ::tracing::info!(
        method = %method,
        uri = %uri,
        status = status.as_u16(),
        elapsed_ms = duration.as_millis() as u64,
        "Request completed"
    );

    response
}

/// Common imports for binaries and integration tests.
pub mod prelude {
    pub use crate::db::{self, DbPool};
    pub use crate::dto::{
        CreateCategoryRequest, CreateTagRequest, CreateTaskRequest, CreateUserRequest,
        UpdateTaskRequest,
    };
    pub use crate::errors::{AppError, ServiceError};
    pub use crate::services::{
        ActivityService, AttachmentService, AuthService, CategoryService, TagService,
        TaskService, UserService,
    };
    pub use crate::AppState;
}
