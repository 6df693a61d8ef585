use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validate_hex_color;

use crate::entities::user::{Model as UserModel, UserRole, UserStatus};

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(length(max = 50))]
    pub username: String,
    #[serde(default)]
    #[validate(email, length(max = 100))]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub full_name: String,
    #[schema(example = "MEMBER")]
    pub role: Option<String>,
    #[validate(custom = "validate_hex_color")]
    pub avatar_color: Option<String>,
}

/// Partial user update. An empty `password` leaves the stored hash untouched.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    #[validate(custom = "validate_hex_color")]
    pub avatar_color: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub avatar_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserModel> for UserDto {
    fn from(user: UserModel) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            status: user.status,
            avatar_color: user.avatar_color,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
