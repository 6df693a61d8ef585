use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use crate::dto::ActivityDto;
use crate::entities::{activity_log, ActionType};
use crate::errors::ServiceError;
use crate::repositories::{ActivityLogRepository, TaskRepository, UserRepository};

/// Builds an unsaved activity entry.
pub(crate) fn entry(
    task_id: i32,
    user_id: i32,
    action_type: ActionType,
    old_value: Option<String>,
    new_value: Option<String>,
    description: impl Into<String>,
) -> activity_log::ActiveModel {
    activity_log::ActiveModel {
        task_id: Set(task_id),
        user_id: Set(user_id),
        action_type: Set(action_type),
        old_value: Set(old_value),
        new_value: Set(new_value),
        description: Set(Some(description.into())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

/// Read side of the task history.
#[derive(Clone)]
pub struct ActivityService {
    activity: ActivityLogRepository,
    tasks: TaskRepository,
    users: UserRepository,
}

impl ActivityService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            activity: ActivityLogRepository::new(db.clone()),
            tasks: TaskRepository::new(db.clone()),
            users: UserRepository::new(db),
        }
    }

    /// History of `task_id`, oldest first.
    #[instrument(skip(self))]
    pub async fn list_for_task(&self, task_id: i32) -> Result<Vec<ActivityDto>, ServiceError> {
        if !self.tasks.exists_by_id(task_id).await? {
            return Err(ServiceError::not_found("Task", task_id));
        }

        let entries = self.activity.find_by_task(task_id).await?;
        let mut user_ids: Vec<i32> = entries.iter().map(|e| e.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let usernames: HashMap<i32, String> = self
            .users
            .find_by_ids(user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(entries
            .into_iter()
            .map(|e| ActivityDto {
                activity_id: e.id,
                task_id: e.task_id,
                user_id: e.user_id,
                username: usernames.get(&e.user_id).cloned(),
                action_type: e.action_type,
                old_value: e.old_value,
                new_value: e.new_value,
                description: e.description,
                created_at: e.created_at,
            })
            .collect())
    }
}
