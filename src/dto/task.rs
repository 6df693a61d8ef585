use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::catalog::TagDto;
use crate::entities::task::{TaskPriority, TaskStatus};

/// Body of `POST /api/tasks`. Status and priority arrive as strings and are
/// parsed case-insensitively.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "PENDING")]
    pub status: Option<String>,
    #[schema(example = "MEDIUM")]
    pub priority: Option<String>,
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-06-01")]
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
    pub created_by_id: Option<i32>,
}

/// Body of `PUT /api/tasks/{id}`. Absent fields keep their stored value.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignUserRequest {
    pub user_id: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTagRequest {
    pub tag_id: i32,
}

/// List-view shape of a task.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskSimpleDto {
    pub task_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub start_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub category_name: Option<String>,
    pub created_by_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignedUserDto {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub avatar_color: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDto {
    pub assignment_id: i32,
    pub task_id: i32,
    pub user_id: i32,
    pub assigned_at: DateTime<Utc>,
}

/// Detail-view shape of a task, including its assignees and tags.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailDto {
    pub task_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub start_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub created_by_id: i32,
    pub created_by_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assigned_users: Vec<AssignedUserDto>,
    pub tags: Vec<TagDto>,
}
