pub mod attachments;
pub mod auth;
pub mod categories;
pub mod common;
pub mod health;
pub mod tags;
pub mod tasks;
pub mod users;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::services::{
    ActivityService, AttachmentService, AuthService, CategoryService, TagService, TaskService,
    UserService,
};
use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json, Router,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Header naming the user on whose behalf a task mutation is performed.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub tasks: Arc<TaskService>,
    pub users: Arc<UserService>,
    pub categories: Arc<CategoryService>,
    pub tags: Arc<TagService>,
    pub attachments: Arc<AttachmentService>,
    pub activity: Arc<ActivityService>,
    pub auth: Arc<AuthService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        Self {
            tasks: Arc::new(TaskService::new(db_pool.clone())),
            users: Arc::new(UserService::new(db_pool.clone())),
            categories: Arc::new(CategoryService::new(db_pool.clone())),
            tags: Arc::new(TagService::new(db_pool.clone())),
            attachments: Arc::new(AttachmentService::new(db_pool.clone())),
            activity: Arc::new(ActivityService::new(db_pool.clone())),
            auth: Arc::new(AuthService::new(db_pool, config)),
        }
    }
}

/// Optional acting user taken from `x-actor-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actor(pub Option<i32>);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACTOR_HEADER) else {
            return Ok(Actor(None));
        };
        value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .map(|id| Actor(Some(id)))
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("{} must be a numeric user id", ACTOR_HEADER))
            })
    }
}

/// JSON request body whose rejections render as the JSON error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ApiJson(value))
            .map_err(|rejection| ServiceError::ValidationError(rejection.body_text()))
    }
}

/// Every REST route under `/api`, plus `/health`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/tasks", tasks::task_routes().merge(attachments::attachment_routes()))
        .nest("/api/trash", tasks::trash_routes())
        .nest("/api/users", users::user_routes())
        .nest("/api/categories", categories::category_routes())
        .nest("/api/tags", tags::tag_routes())
        .nest("/api/auth", auth::auth_routes())
        .merge(health::health_routes())
}
