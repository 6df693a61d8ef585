use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::UserRole;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub email: String,
}
