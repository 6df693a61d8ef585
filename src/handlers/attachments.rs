use super::common::{created_response, no_content_response, success_response};
use super::{Actor, ApiJson};
use crate::{
    dto::{AttachmentDto, CreateAttachmentRequest},
    errors::ServiceError,
    handlers::AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get},
    Router,
};

/// Attachment routes, merged into the `/api/tasks` router.
pub fn attachment_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/attachments", get(list_attachments).post(add_attachment))
        .route("/:id/attachments/:attachment_id", delete(remove_attachment))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{id}/attachments",
    params(("id" = i32, Path, description = "Task id")),
    responses(
        (status = 200, description = "Attachments of the task", body = [AttachmentDto]),
        (status = 404, description = "Task not found", body = crate::errors::ErrorResponse)
    ),
    tag = "attachments"
)]
pub async fn list_attachments(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let attachments = state.services.attachments.list_for_task(id).await?;
    Ok(success_response(attachments))
}

/// Record attachment metadata for a task
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/attachments",
    params(("id" = i32, Path, description = "Task id")),
    request_body = CreateAttachmentRequest,
    responses(
        (status = 201, description = "Attachment recorded", body = AttachmentDto),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Task not found", body = crate::errors::ErrorResponse)
    ),
    tag = "attachments"
)]
pub async fn add_attachment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<CreateAttachmentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let attachment = state.services.attachments.add_attachment(id, payload).await?;
    Ok(created_response(attachment))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}/attachments/{attachment_id}",
    params(
        ("id" = i32, Path, description = "Task id"),
        ("attachment_id" = i32, Path, description = "Attachment id"),
        ("X-Actor-Id" = Option<i32>, Header, description = "Acting user; defaults to the uploader")
    ),
    responses(
        (status = 204, description = "Attachment removed"),
        (status = 404, description = "Attachment not found on this task", body = crate::errors::ErrorResponse)
    ),
    tag = "attachments"
)]
pub async fn remove_attachment(
    State(state): State<AppState>,
    Path((id, attachment_id)): Path<(i32, i32)>,
    Actor(actor): Actor,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .attachments
        .remove_attachment(id, attachment_id, actor)
        .await?;
    Ok(no_content_response())
}
