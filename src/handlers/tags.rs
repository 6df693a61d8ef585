use super::common::{created_response, no_content_response, success_response};
use super::ApiJson;
use crate::{
    dto::{CreateTagRequest, TagDto},
    errors::ServiceError,
    handlers::AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get},
    Router,
};

pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/:id", delete(delete_tag))
}

#[utoipa::path(
    get,
    path = "/api/tags",
    responses((status = 200, description = "Tags by name", body = [TagDto])),
    tag = "tags"
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let tags = state.services.tags.list_tags().await?;
    Ok(success_response(tags))
}

#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagDto),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::errors::ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn create_tag(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateTagRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let tag = state.services.tags.create_tag(payload).await?;
    Ok(created_response(tag))
}

/// Delete a tag and detach it from every task
#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    params(("id" = i32, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.tags.delete_tag(id).await?;
    Ok(no_content_response())
}
