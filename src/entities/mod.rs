pub mod activity_log;
pub mod category;
pub mod tag;
pub mod task;
pub mod task_assignment;
pub mod task_attachment;
pub mod task_tag;
pub mod user;

pub use activity_log::ActionType;
pub use task::{TaskPriority, TaskStatus};
pub use user::{UserRole, UserStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn enum_wire_names_are_screaming_snake_case() {
        assert_eq!(TaskStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(TaskStatus::ToDo.to_string(), "TO_DO");
        assert_eq!(UserRole::GroupLeader.to_string(), "GROUP_LEADER");
        assert_eq!(ActionType::StatusChanged.to_string(), "STATUS_CHANGED");
        assert_eq!(
            serde_json::to_value(TaskPriority::Urgent).unwrap(),
            serde_json::json!("URGENT")
        );
    }

    #[test]
    fn enums_parse_their_own_display_form() {
        assert_eq!(TaskStatus::from_str("DONE").unwrap(), TaskStatus::Done);
        assert_eq!(TaskPriority::from_str("LOW").unwrap(), TaskPriority::Low);
        assert_eq!(UserStatus::from_str("INACTIVE").unwrap(), UserStatus::Inactive);
        assert!(TaskStatus::from_str("ARCHIVED").is_err());
    }

    #[test]
    fn task_defaults_are_pending_and_medium() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }
}
