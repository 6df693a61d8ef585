//! Business rules. Handlers and the web UI call into these; nothing below talks HTTP.

pub mod activity;
pub mod attachments;
pub mod auth;
pub mod categories;
pub mod tags;
pub mod tasks;
pub mod users;

pub use activity::ActivityService;
pub use attachments::AttachmentService;
pub use auth::AuthService;
pub use categories::CategoryService;
pub use tags::TagService;
pub use tasks::TaskService;
pub use users::UserService;

use crate::errors::ServiceError;
use std::str::FromStr;

/// Parses an enum wire value case-insensitively.
pub(crate) fn parse_enum<T: FromStr>(field: &str, raw: &str) -> Result<T, ServiceError> {
    raw.trim()
        .to_ascii_uppercase()
        .parse::<T>()
        .map_err(|_| ServiceError::InvalidInput(format!("Invalid {}: {}", field, raw.trim())))
}

/// Trims `value`, failing with a validation error when nothing is left.
pub(crate) fn require_text(field: &str, value: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ServiceError::ValidationError(format!("{} is required", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Maps `Some("")` to `None` so blank optional fields are not stored.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TaskStatus;
    use assert_matches::assert_matches;

    #[test]
    fn parse_enum_is_case_insensitive() {
        let status: TaskStatus = parse_enum("status", " in_progress ").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
    }

    #[test]
    fn parse_enum_rejects_unknown_values_as_invalid_input() {
        let err = parse_enum::<TaskStatus>("status", "ARCHIVED").unwrap_err();
        assert_matches!(err, ServiceError::InvalidInput(msg) if msg.contains("ARCHIVED"));
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("title", "  Plan  ").unwrap(), "Plan");
        assert_matches!(
            require_text("title", "   "),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn non_blank_drops_empty_strings() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" x ".into())), Some("x".into()));
        assert_eq!(non_blank(None), None);
    }
}
