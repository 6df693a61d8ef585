//! Request and response shapes for the REST surface. All JSON is camelCase.

pub mod activity;
pub mod attachment;
pub mod auth;
pub mod catalog;
pub mod task;
pub mod user;

pub use activity::ActivityDto;
pub use attachment::{AttachmentDto, CreateAttachmentRequest};
pub use auth::{LoginRequest, LoginResponse};
pub use catalog::{
    CategoryDto, CreateCategoryRequest, CreateTagRequest, TagDto, UpdateCategoryRequest,
};
pub use task::{
    AddTagRequest, AssignUserRequest, AssignedUserDto, AssignmentDto, CreateTaskRequest,
    TaskDetailDto, TaskSimpleDto, UpdateTaskRequest,
};
pub use user::{CreateUserRequest, UpdateUserRequest, UserDto};

use validator::ValidationError;

/// `#RRGGBB` colour used for avatars, categories and tags.
pub(crate) fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let bytes = color.as_bytes();
    let valid = bytes.len() == 7
        && bytes[0] == b'#'
        && bytes[1..].iter().all(|b| b.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("Must be a colour of the form #RRGGBB".into());
        Err(err)
    }
}
