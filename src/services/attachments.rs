use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::activity::entry;
use super::{non_blank, require_text};
use crate::dto::{AttachmentDto, CreateAttachmentRequest};
use crate::entities::task_attachment::{self, Model as AttachmentModel};
use crate::entities::ActionType;
use crate::errors::ServiceError;
use crate::repositories::{
    ActivityLogRepository, AttachmentRepository, TaskRepository, UserRepository,
};

/// Attachment metadata for tasks. File contents are stored by the caller.
#[derive(Clone)]
pub struct AttachmentService {
    db: Arc<DatabaseConnection>,
    attachments: AttachmentRepository,
    tasks: TaskRepository,
    users: UserRepository,
    activity: ActivityLogRepository,
}

impl AttachmentService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            attachments: AttachmentRepository::new(db.clone()),
            tasks: TaskRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            activity: ActivityLogRepository::new(db.clone()),
            db,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_for_task(&self, task_id: i32) -> Result<Vec<AttachmentDto>, ServiceError> {
        self.ensure_task(task_id).await?;
        let attachments = self.attachments.find_by_task(task_id).await?;
        let usernames: HashMap<i32, String> = self
            .users
            .find_by_ids(attachments.iter().map(|a| a.uploaded_by).collect())
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(attachments
            .into_iter()
            .map(|a| {
                let username = usernames.get(&a.uploaded_by).cloned();
                to_dto(a, username)
            })
            .collect())
    }

    #[instrument(skip(self, input))]
    pub async fn add_attachment(
        &self,
        task_id: i32,
        input: CreateAttachmentRequest,
    ) -> Result<AttachmentDto, ServiceError> {
        let file_name = require_text("fileName", &input.file_name)?;
        let file_path = require_text("filePath", &input.file_path)?;
        input.validate()?;
        if input.file_size.map_or(false, |size| size < 0) {
            return Err(ServiceError::ValidationError(
                "fileSize must not be negative".to_string(),
            ));
        }
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", task_id))?;
        let uploaded_by = input.uploaded_by_id.unwrap_or(task.created_by);
        let uploader = self.users.find_by_id(uploaded_by).await?.ok_or_else(|| {
            ServiceError::ValidationError(format!("User {} does not exist", uploaded_by))
        })?;

        let txn = self.db.begin().await?;
        let attachment = self
            .attachments
            .create(
                &txn,
                task_attachment::ActiveModel {
                    task_id: Set(task_id),
                    file_name: Set(file_name),
                    file_path: Set(file_path),
                    file_size: Set(input.file_size),
                    mime_type: Set(non_blank(input.mime_type)),
                    uploaded_by: Set(uploaded_by),
                    uploaded_at: Set(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;
        self.activity
            .append(
                &txn,
                entry(
                    task_id,
                    uploaded_by,
                    ActionType::FileUploaded,
                    None,
                    Some(attachment.file_name.clone()),
                    format!("Uploaded {}", attachment.file_name),
                ),
            )
            .await?;
        txn.commit().await?;

        info!(task_id, attachment_id = attachment.id, "Attachment added");
        Ok(to_dto(attachment, Some(uploader.username)))
    }

    /// Removes an attachment of `task_id`. The actor defaults to the uploader.
    #[instrument(skip(self))]
    pub async fn remove_attachment(
        &self,
        task_id: i32,
        attachment_id: i32,
        actor: Option<i32>,
    ) -> Result<(), ServiceError> {
        let attachment = self
            .attachments
            .find_by_id(attachment_id)
            .await?
            .filter(|a| a.task_id == task_id)
            .ok_or_else(|| ServiceError::not_found("Attachment", attachment_id))?;

        let actor = match actor {
            Some(user_id) => {
                if self.users.find_by_id(user_id).await?.is_none() {
                    return Err(ServiceError::ValidationError(format!(
                        "Acting user {} does not exist",
                        user_id
                    )));
                }
                user_id
            }
            None => attachment.uploaded_by,
        };
        let file_name = attachment.file_name.clone();

        let txn = self.db.begin().await?;
        self.attachments.delete(&txn, attachment).await?;
        self.activity
            .append(
                &txn,
                entry(
                    task_id,
                    actor,
                    ActionType::FileRemoved,
                    Some(file_name.clone()),
                    None,
                    format!("Removed {}", file_name),
                ),
            )
            .await?;
        txn.commit().await?;

        info!(task_id, attachment_id, "Attachment removed");
        Ok(())
    }

    async fn ensure_task(&self, task_id: i32) -> Result<(), ServiceError> {
        if self.tasks.exists_by_id(task_id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("Task", task_id))
        }
    }
}

fn to_dto(attachment: AttachmentModel, uploaded_by_username: Option<String>) -> AttachmentDto {
    AttachmentDto {
        attachment_id: attachment.id,
        task_id: attachment.task_id,
        file_name: attachment.file_name,
        file_path: attachment.file_path,
        file_size: attachment.file_size,
        mime_type: attachment.mime_type,
        uploaded_by_id: attachment.uploaded_by,
        uploaded_by_username,
        uploaded_at: attachment.uploaded_at,
    }
}
