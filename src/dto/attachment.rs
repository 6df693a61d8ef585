use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Metadata for a file that was stored elsewhere.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAttachmentRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub file_name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub file_path: String,
    pub file_size: Option<i64>,
    #[validate(length(max = 100))]
    pub mime_type: Option<String>,
    pub uploaded_by_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub attachment_id: i32,
    pub task_id: i32,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub uploaded_by_id: i32,
    pub uploaded_by_username: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}
