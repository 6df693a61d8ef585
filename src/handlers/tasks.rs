use super::common::{created_response, no_content_response, ok_response, success_response};
use super::{Actor, ApiJson};
use crate::{
    dto::{
        ActivityDto, AddTagRequest, AssignUserRequest, AssignmentDto, CreateTaskRequest,
        TaskDetailDto, TaskSimpleDto, UpdateTaskRequest,
    },
    errors::ServiceError,
    handlers::AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};

/// Routes nested under `/api/tasks`.
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/by-status/:status", get(list_tasks_by_status))
        .route(
            "/:id",
            get(get_task).put(update_task).delete(soft_delete_task),
        )
        .route("/:id/restore", put(restore_task))
        .route("/:id/assignments", post(assign_user))
        .route("/:id/assignments/:user_id", delete(unassign_user))
        .route("/:id/tags", post(add_tag))
        .route("/:id/tags/:tag_id", delete(remove_tag))
        .route("/:id/activity", get(list_activity))
}

/// Routes nested under `/api/trash`.
pub fn trash_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trash))
        .route("/:id", delete(purge_task))
}

/// List tasks that are not in the trash
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Active tasks", body = [TaskSimpleDto]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn list_tasks(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let tasks = state.services.tasks.list_active().await?;
    Ok(success_response(tasks))
}

/// Get a task with its assignees and tags
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = i32, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task found", body = TaskDetailDto),
        (status = 404, description = "Task not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.services.tasks.get_task(id).await?;
    Ok(success_response(task))
}

/// Create a task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskDetailDto,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.services.tasks.create_task(payload).await?;
    Ok(created_response(task))
}

/// Update the supplied fields of a task
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(
        ("id" = i32, Path, description = "Task id"),
        ("X-Actor-Id" = Option<i32>, Header, description = "Acting user; defaults to the task creator")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskDetailDto),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Task not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Actor(actor): Actor,
    ApiJson(payload): ApiJson<UpdateTaskRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.services.tasks.update_task(id, payload, actor).await?;
    Ok(success_response(task))
}

/// Move a task to the trash
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(
        ("id" = i32, Path, description = "Task id"),
        ("X-Actor-Id" = Option<i32>, Header, description = "Acting user; defaults to the task creator")
    ),
    responses(
        (status = 200, description = "Task moved to trash"),
        (status = 404, description = "Task not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn soft_delete_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Actor(actor): Actor,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.tasks.soft_delete(id, actor).await?;
    Ok(ok_response())
}

/// Bring a task back from the trash
#[utoipa::path(
    put,
    path = "/api/tasks/{id}/restore",
    params(
        ("id" = i32, Path, description = "Task id"),
        ("X-Actor-Id" = Option<i32>, Header, description = "Acting user; defaults to the task creator")
    ),
    responses(
        (status = 200, description = "Task restored", body = TaskDetailDto),
        (status = 404, description = "Task not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn restore_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Actor(actor): Actor,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.services.tasks.restore(id, actor).await?;
    Ok(success_response(task))
}

/// List non-deleted tasks with the given status
#[utoipa::path(
    get,
    path = "/api/tasks/by-status/{status}",
    params(("status" = String, Path, description = "PENDING, TO_DO, IN_PROGRESS or DONE (any case)")),
    responses(
        (status = 200, description = "Matching tasks", body = [TaskSimpleDto]),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn list_tasks_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let tasks = state.services.tasks.list_by_status(&status).await?;
    Ok(success_response(tasks))
}

/// List tasks in the trash
#[utoipa::path(
    get,
    path = "/api/trash",
    responses(
        (status = 200, description = "Deleted tasks", body = [TaskSimpleDto])
    ),
    tag = "trash"
)]
pub async fn list_trash(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let tasks = state.services.tasks.list_deleted().await?;
    Ok(success_response(tasks))
}

/// Permanently delete a trashed task and everything attached to it
#[utoipa::path(
    delete,
    path = "/api/trash/{id}",
    params(("id" = i32, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task purged"),
        (status = 404, description = "Task not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Task is not in the trash", body = crate::errors::ErrorResponse)
    ),
    tag = "trash"
)]
pub async fn purge_task(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.tasks.purge(id).await?;
    Ok(no_content_response())
}

/// Assign a user to a task
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/assignments",
    params(
        ("id" = i32, Path, description = "Task id"),
        ("X-Actor-Id" = Option<i32>, Header, description = "Acting user; defaults to the task creator")
    ),
    request_body = AssignUserRequest,
    responses(
        (status = 201, description = "User assigned", body = AssignmentDto),
        (status = 404, description = "Task or user not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Already assigned", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn assign_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Actor(actor): Actor,
    ApiJson(payload): ApiJson<AssignUserRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let assignment = state
        .services
        .tasks
        .assign_user(id, payload.user_id, actor)
        .await?;
    Ok(created_response(assignment))
}

/// Remove a user from a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}/assignments/{user_id}",
    params(
        ("id" = i32, Path, description = "Task id"),
        ("user_id" = i32, Path, description = "Assigned user id"),
        ("X-Actor-Id" = Option<i32>, Header, description = "Acting user; defaults to the task creator")
    ),
    responses(
        (status = 204, description = "User unassigned"),
        (status = 404, description = "Assignment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn unassign_user(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i32, i32)>,
    Actor(actor): Actor,
) -> Result<impl IntoResponse, ServiceError> {
    state
        .services
        .tasks
        .unassign_user(id, user_id, actor)
        .await?;
    Ok(no_content_response())
}

/// Attach a tag to a task
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/tags",
    params(("id" = i32, Path, description = "Task id")),
    request_body = AddTagRequest,
    responses(
        (status = 200, description = "Tag attached", body = TaskDetailDto),
        (status = 404, description = "Task or tag not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn add_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<AddTagRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.services.tasks.add_tag(id, payload.tag_id).await?;
    Ok(success_response(task))
}

/// Detach a tag from a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}/tags/{tag_id}",
    params(
        ("id" = i32, Path, description = "Task id"),
        ("tag_id" = i32, Path, description = "Tag id")
    ),
    responses(
        (status = 200, description = "Tag detached", body = TaskDetailDto),
        (status = 404, description = "Task not found or tag not attached", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn remove_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, ServiceError> {
    let task = state.services.tasks.remove_tag(id, tag_id).await?;
    Ok(success_response(task))
}

/// Activity history of a task, oldest first
#[utoipa::path(
    get,
    path = "/api/tasks/{id}/activity",
    params(("id" = i32, Path, description = "Task id")),
    responses(
        (status = 200, description = "Activity entries", body = [ActivityDto]),
        (status = 404, description = "Task not found", body = crate::errors::ErrorResponse)
    ),
    tag = "tasks"
)]
pub async fn list_activity(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let entries = state.services.activity.list_for_task(id).await?;
    Ok(success_response(entries))
}
