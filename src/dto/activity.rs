use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::ActionType;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDto {
    pub activity_id: i32,
    pub task_id: i32,
    pub user_id: i32,
    pub username: Option<String>,
    pub action_type: ActionType,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
