use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validate_hex_color;

use crate::entities::{category, tag};

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[serde(default)]
    #[validate(length(max = 50))]
    pub name: String,
    #[validate(custom = "validate_hex_color")]
    pub color: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(max = 50))]
    pub name: Option<String>,
    #[validate(custom = "validate_hex_color")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub category_id: i32,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<category::Model> for CategoryDto {
    fn from(model: category::Model) -> Self {
        Self {
            category_id: model.id,
            name: model.name,
            color: model.color,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    #[serde(default)]
    #[validate(length(max = 50))]
    pub name: String,
    #[validate(custom = "validate_hex_color")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub tag_id: i32,
    pub name: String,
    pub color: Option<String>,
}

impl From<tag::Model> for TagDto {
    fn from(model: tag::Model) -> Self {
        Self {
            tag_id: model.id,
            name: model.name,
            color: model.color,
        }
    }
}
