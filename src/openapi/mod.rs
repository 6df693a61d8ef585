use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Manager API",
        version = "0.1.0",
        description = r#"
# Task Manager API

Multi-user task board: tasks with status and priority, a trash with restore,
assignments, categories, tags, attachment metadata and a per-task activity log.

## Acting user

Task mutations accept an optional `X-Actor-Id` header naming the user recorded in
the activity log. Without it the task creator is recorded.

## Error Handling

Errors share one JSON shape:

```json
{
  "error": "Not Found",
  "message": "Task 7 not found",
  "requestId": "5c1d0b1e-9f1e-4b8e-8f0e-1a2b3c4d5e6f",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "tasks", description = "Task lifecycle, assignments, tags and activity"),
        (name = "trash", description = "Soft-deleted tasks"),
        (name = "attachments", description = "Attachment metadata"),
        (name = "users", description = "User accounts"),
        (name = "categories", description = "Task categories"),
        (name = "tags", description = "Task labels"),
        (name = "auth", description = "Token issuing"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        // Tasks
        crate::handlers::tasks::list_tasks,
        crate::handlers::tasks::get_task,
        crate::handlers::tasks::create_task,
        crate::handlers::tasks::update_task,
        crate::handlers::tasks::soft_delete_task,
        crate::handlers::tasks::restore_task,
        crate::handlers::tasks::list_tasks_by_status,
        crate::handlers::tasks::assign_user,
        crate::handlers::tasks::unassign_user,
        crate::handlers::tasks::add_tag,
        crate::handlers::tasks::remove_tag,
        crate::handlers::tasks::list_activity,

        // Trash
        crate::handlers::tasks::list_trash,
        crate::handlers::tasks::purge_task,

        // Attachments
        crate::handlers::attachments::list_attachments,
        crate::handlers::attachments::add_attachment,
        crate::handlers::attachments::remove_attachment,

        // Users
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::deactivate_user,
        crate::handlers::users::activate_user,

        // Catalog
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::create_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::tags::list_tags,
        crate::handlers::tags::create_tag,
        crate::handlers::tags::delete_tag,

        crate::handlers::auth::login,
        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            // Task types
            crate::dto::CreateTaskRequest,
            crate::dto::UpdateTaskRequest,
            crate::dto::TaskSimpleDto,
            crate::dto::TaskDetailDto,
            crate::dto::AssignUserRequest,
            crate::dto::AssignmentDto,
            crate::dto::AssignedUserDto,
            crate::dto::AddTagRequest,
            crate::dto::ActivityDto,
            crate::entities::TaskStatus,
            crate::entities::TaskPriority,
            crate::entities::ActionType,

            // Attachment types
            crate::dto::CreateAttachmentRequest,
            crate::dto::AttachmentDto,

            // User types
            crate::dto::CreateUserRequest,
            crate::dto::UpdateUserRequest,
            crate::dto::UserDto,
            crate::entities::UserRole,
            crate::entities::UserStatus,
            crate::dto::LoginRequest,
            crate::dto::LoginResponse,

            // Catalog types
            crate::dto::CreateCategoryRequest,
            crate::dto::UpdateCategoryRequest,
            crate::dto::CategoryDto,
            crate::dto::CreateTagRequest,
            crate::dto::TagDto,

            crate::handlers::health::HealthResponse,
            crate::handlers::health::ComponentStatus,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_rest_surface() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Task Manager API"));
        assert!(json.contains("/api/tasks/{id}/restore"));
        assert!(json.contains("/api/trash/{id}"));
        assert!(json.contains("/api/auth/login"));
        assert!(json.contains("TaskDetailDto"));
    }
}
