use chrono::Utc;
use sea_orm::{DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::activity::entry;
use super::{non_blank, parse_enum, require_text};
use crate::dto::{
    AssignedUserDto, AssignmentDto, CreateTaskRequest, TagDto, TaskDetailDto, TaskSimpleDto,
    UpdateTaskRequest,
};
use crate::entities::task::{self, Model as TaskModel, TaskPriority, TaskStatus};
use crate::entities::{task_assignment, ActionType};
use crate::errors::ServiceError;
use crate::repositories::{
    ActivityLogRepository, AssignmentRepository, AttachmentRepository, CategoryRepository,
    TagRepository, TaskRepository, UserRepository,
};

/// Task lifecycle: creation, partial updates, soft delete and restore, purge,
/// assignments and tag links. Every mutation is written together with its
/// activity entry in one transaction.
#[derive(Clone)]
pub struct TaskService {
    db: Arc<DatabaseConnection>,
    tasks: TaskRepository,
    users: UserRepository,
    categories: CategoryRepository,
    tags: TagRepository,
    assignments: AssignmentRepository,
    attachments: AttachmentRepository,
    activity: ActivityLogRepository,
}

impl TaskService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            tasks: TaskRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            categories: CategoryRepository::new(db.clone()),
            tags: TagRepository::new(db.clone()),
            assignments: AssignmentRepository::new(db.clone()),
            attachments: AttachmentRepository::new(db.clone()),
            activity: ActivityLogRepository::new(db.clone()),
            db,
        }
    }

    /// Tasks that are not in the trash.
    #[instrument(skip(self))]
    pub async fn list_active(&self) -> Result<Vec<TaskSimpleDto>, ServiceError> {
        let tasks = self.tasks.find_by_is_deleted(false).await?;
        self.to_simple_dtos(tasks).await
    }

    /// Tasks in the trash.
    #[instrument(skip(self))]
    pub async fn list_deleted(&self) -> Result<Vec<TaskSimpleDto>, ServiceError> {
        let tasks = self.tasks.find_by_is_deleted(true).await?;
        self.to_simple_dtos(tasks).await
    }

    /// Non-deleted tasks whose status matches `raw` (case-insensitive).
    #[instrument(skip(self))]
    pub async fn list_by_status(&self, raw: &str) -> Result<Vec<TaskSimpleDto>, ServiceError> {
        let status: TaskStatus = parse_enum("status", raw)?;
        let tasks = self.tasks.find_active_by_status(status).await?;
        self.to_simple_dtos(tasks).await
    }

    #[instrument(skip(self))]
    pub async fn get_task(&self, id: i32) -> Result<TaskDetailDto, ServiceError> {
        let task = self.load(id).await?;
        self.to_detail(task).await
    }

    #[instrument(skip(self, input))]
    pub async fn create_task(
        &self,
        input: CreateTaskRequest,
    ) -> Result<TaskDetailDto, ServiceError> {
        input.validate()?;
        let title = require_text("title", &input.title)?;
        let due_date = input
            .due_date
            .ok_or_else(|| ServiceError::ValidationError("dueDate is required".to_string()))?;
        let created_by = input
            .created_by_id
            .ok_or_else(|| ServiceError::ValidationError("createdById is required".to_string()))?;
        let status = parse_optional::<TaskStatus>("status", input.status)?.unwrap_or_default();
        let priority =
            parse_optional::<TaskPriority>("priority", input.priority)?.unwrap_or_default();

        if self.users.find_by_id(created_by).await?.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "User {} does not exist",
                created_by
            )));
        }
        if let Some(category_id) = input.category_id {
            self.ensure_category(category_id).await?;
        }

        let now = Utc::now();
        let new_task = task::ActiveModel {
            title: Set(title),
            description: Set(non_blank(input.description)),
            status: Set(status),
            priority: Set(priority),
            start_date: Set(input.start_date),
            due_date: Set(due_date),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            category_id: Set(input.category_id),
            created_by: Set(created_by),
            ..Default::default()
        };

        let txn = self.db.begin().await?;
        let task = self.tasks.save(&txn, new_task).await?;
        self.activity
            .append(
                &txn,
                entry(
                    task.id,
                    created_by,
                    ActionType::Created,
                    None,
                    Some(task.title.clone()),
                    format!("Created task \"{}\"", task.title),
                ),
            )
            .await?;
        txn.commit().await?;

        info!(task_id = task.id, "Task created");
        self.to_detail(task).await
    }

    /// Applies only the supplied fields. `updated_at` is refreshed even when
    /// nothing else changed.
    #[instrument(skip(self, input))]
    pub async fn update_task(
        &self,
        id: i32,
        input: UpdateTaskRequest,
        actor: Option<i32>,
    ) -> Result<TaskDetailDto, ServiceError> {
        input.validate()?;
        let task = self.load(id).await?;
        let actor = self.resolve_actor(actor, &task).await?;

        let new_status = parse_optional::<TaskStatus>("status", input.status)?
            .filter(|status| *status != task.status);
        let new_priority = parse_optional::<TaskPriority>("priority", input.priority)?;

        let mut active = task.clone().into_active_model();
        let mut changed: Vec<&'static str> = Vec::new();

        if let Some(title) = input.title {
            let title = require_text("title", &title)?;
            if title != task.title {
                active.title = Set(title);
                changed.push("title");
            }
        }
        if let Some(description) = input.description {
            let description = non_blank(Some(description));
            if description != task.description {
                active.description = Set(description);
                changed.push("description");
            }
        }
        if let Some(priority) = new_priority.filter(|p| *p != task.priority) {
            active.priority = Set(priority);
            changed.push("priority");
        }
        if let Some(start_date) = input.start_date.filter(|d| Some(*d) != task.start_date) {
            active.start_date = Set(Some(start_date));
            changed.push("startDate");
        }
        if let Some(due_date) = input.due_date.filter(|d| *d != task.due_date) {
            active.due_date = Set(due_date);
            changed.push("dueDate");
        }
        if let Some(category_id) = input.category_id.filter(|c| Some(*c) != task.category_id) {
            self.ensure_category(category_id).await?;
            active.category_id = Set(Some(category_id));
            changed.push("category");
        }
        if let Some(status) = new_status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now());

        let txn = self.db.begin().await?;
        let updated = self.tasks.save(&txn, active).await?;
        if let Some(status) = new_status {
            self.activity
                .append(
                    &txn,
                    entry(
                        id,
                        actor,
                        ActionType::StatusChanged,
                        Some(task.status.to_string()),
                        Some(status.to_string()),
                        format!("Status changed from {} to {}", task.status, status),
                    ),
                )
                .await?;
        }
        if !changed.is_empty() {
            self.activity
                .append(
                    &txn,
                    entry(
                        id,
                        actor,
                        ActionType::Updated,
                        None,
                        None,
                        format!("Updated {}", changed.join(", ")),
                    ),
                )
                .await?;
        }
        txn.commit().await?;

        info!(task_id = id, "Task updated");
        self.to_detail(updated).await
    }

    /// Moves a task to the trash. Repeating it only refreshes `deleted_at`.
    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: i32, actor: Option<i32>) -> Result<(), ServiceError> {
        let task = self.load(id).await?;
        let actor = self.resolve_actor(actor, &task).await?;

        let now = Utc::now();
        let mut active = task.into_active_model();
        active.is_deleted = Set(true);
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        let txn = self.db.begin().await?;
        let task = self.tasks.save(&txn, active).await?;
        self.activity
            .append(
                &txn,
                entry(
                    id,
                    actor,
                    ActionType::Deleted,
                    None,
                    None,
                    format!("Moved \"{}\" to trash", task.title),
                ),
            )
            .await?;
        txn.commit().await?;

        info!(task_id = id, "Task moved to trash");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn restore(&self, id: i32, actor: Option<i32>) -> Result<TaskDetailDto, ServiceError> {
        let task = self.load(id).await?;
        let actor = self.resolve_actor(actor, &task).await?;

        let mut active = task.into_active_model();
        active.is_deleted = Set(false);
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());

        let txn = self.db.begin().await?;
        let task = self.tasks.save(&txn, active).await?;
        self.activity
            .append(
                &txn,
                entry(
                    id,
                    actor,
                    ActionType::Restored,
                    None,
                    None,
                    format!("Restored \"{}\" from trash", task.title),
                ),
            )
            .await?;
        txn.commit().await?;

        info!(task_id = id, "Task restored");
        self.to_detail(task).await
    }

    /// Physically removes a trashed task with its assignments, tag links,
    /// attachments and history.
    #[instrument(skip(self))]
    pub async fn purge(&self, id: i32) -> Result<(), ServiceError> {
        let task = self.load(id).await?;
        if !task.is_deleted {
            return Err(ServiceError::Conflict(format!(
                "Task {} must be moved to trash before it can be purged",
                id
            )));
        }

        let txn = self.db.begin().await?;
        let assignments = self.assignments.delete_by_task(&txn, id).await?;
        let tag_links = self.tags.unlink_task(&txn, id).await?;
        let attachments = self.attachments.delete_by_task(&txn, id).await?;
        let entries = self.activity.delete_by_task(&txn, id).await?;
        self.tasks.delete(&txn, id).await?;
        txn.commit().await?;

        info!(
            task_id = id,
            assignments, tag_links, attachments, entries, "Task purged"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn assign_user(
        &self,
        task_id: i32,
        user_id: i32,
        actor: Option<i32>,
    ) -> Result<AssignmentDto, ServiceError> {
        let task = self.load(task_id).await?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))?;
        if self
            .assignments
            .exists_by_task_and_user(task_id, user_id)
            .await?
        {
            return Err(ServiceError::Conflict(format!(
                "User {} is already assigned to task {}",
                user_id, task_id
            )));
        }
        let actor = self.resolve_actor(actor, &task).await?;

        let txn = self.db.begin().await?;
        let assignment = self
            .assignments
            .create(
                &txn,
                task_assignment::ActiveModel {
                    task_id: Set(task_id),
                    user_id: Set(user_id),
                    assigned_at: Set(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;
        self.activity
            .append(
                &txn,
                entry(
                    task_id,
                    actor,
                    ActionType::Assigned,
                    None,
                    Some(user.username.clone()),
                    format!("Assigned {}", user.username),
                ),
            )
            .await?;
        txn.commit().await?;

        info!(task_id, user_id, "User assigned to task");
        Ok(AssignmentDto {
            assignment_id: assignment.id,
            task_id: assignment.task_id,
            user_id: assignment.user_id,
            assigned_at: assignment.assigned_at,
        })
    }

    #[instrument(skip(self))]
    pub async fn unassign_user(
        &self,
        task_id: i32,
        user_id: i32,
        actor: Option<i32>,
    ) -> Result<(), ServiceError> {
        let task = self.load(task_id).await?;
        let assignment = self
            .assignments
            .find_by_task_and_user(task_id, user_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "User {} is not assigned to task {}",
                    user_id, task_id
                ))
            })?;
        let actor = self.resolve_actor(actor, &task).await?;
        let username = self
            .users
            .find_by_id(user_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| user_id.to_string());

        let txn = self.db.begin().await?;
        self.assignments.delete(&txn, assignment).await?;
        self.activity
            .append(
                &txn,
                entry(
                    task_id,
                    actor,
                    ActionType::Updated,
                    Some(username.clone()),
                    None,
                    format!("Unassigned {}", username),
                ),
            )
            .await?;
        txn.commit().await?;

        info!(task_id, user_id, "User unassigned from task");
        Ok(())
    }

    /// Links a tag to a task. Linking twice is a no-op.
    #[instrument(skip(self))]
    pub async fn add_tag(&self, task_id: i32, tag_id: i32) -> Result<TaskDetailDto, ServiceError> {
        let task = self.load(task_id).await?;
        if self.tags.find_by_id(tag_id).await?.is_none() {
            return Err(ServiceError::not_found("Tag", tag_id));
        }
        if !self.tags.is_linked(task_id, tag_id).await? {
            self.tags.link(task_id, tag_id).await?;
        }
        self.to_detail(task).await
    }

    #[instrument(skip(self))]
    pub async fn remove_tag(
        &self,
        task_id: i32,
        tag_id: i32,
    ) -> Result<TaskDetailDto, ServiceError> {
        let task = self.load(task_id).await?;
        if !self.tags.unlink(task_id, tag_id).await? {
            return Err(ServiceError::NotFound(format!(
                "Tag {} is not attached to task {}",
                tag_id, task_id
            )));
        }
        self.to_detail(task).await
    }

    async fn load(&self, id: i32) -> Result<TaskModel, ServiceError> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task", id))
    }

    async fn ensure_category(&self, category_id: i32) -> Result<(), ServiceError> {
        match self.categories.find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::ValidationError(format!(
                "Category {} does not exist",
                category_id
            ))),
        }
    }

    /// The acting user named by the caller, or the task creator when none was given.
    async fn resolve_actor(
        &self,
        actor: Option<i32>,
        task: &TaskModel,
    ) -> Result<i32, ServiceError> {
        match actor {
            Some(user_id) => match self.users.find_by_id(user_id).await? {
                Some(_) => Ok(user_id),
                None => Err(ServiceError::ValidationError(format!(
                    "Acting user {} does not exist",
                    user_id
                ))),
            },
            None => Ok(task.created_by),
        }
    }

    async fn to_simple_dtos(
        &self,
        tasks: Vec<TaskModel>,
    ) -> Result<Vec<TaskSimpleDto>, ServiceError> {
        let category_ids: BTreeSet<i32> = tasks.iter().filter_map(|t| t.category_id).collect();
        let user_ids: BTreeSet<i32> = tasks.iter().map(|t| t.created_by).collect();

        let categories: HashMap<i32, String> = self
            .categories
            .find_by_ids(category_ids.into_iter().collect())
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let usernames: HashMap<i32, String> = self
            .users
            .find_by_ids(user_ids.into_iter().collect())
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(tasks
            .into_iter()
            .map(|t| {
                let category_name = t.category_id.and_then(|id| categories.get(&id).cloned());
                let created_by_username = usernames.get(&t.created_by).cloned();
                simple_dto(t, category_name, created_by_username)
            })
            .collect())
    }

    async fn to_detail(&self, task: TaskModel) -> Result<TaskDetailDto, ServiceError> {
        let category_name = match task.category_id {
            Some(id) => self.categories.find_by_id(id).await?.map(|c| c.name),
            None => None,
        };
        let created_by_username = self
            .users
            .find_by_id(task.created_by)
            .await?
            .map(|u| u.username);

        let assignments = self.assignments.find_by_task(task.id).await?;
        let users: HashMap<i32, _> = self
            .users
            .find_by_ids(assignments.iter().map(|a| a.user_id).collect())
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        let assigned_users = assignments
            .into_iter()
            .filter_map(|a| {
                users.get(&a.user_id).map(|u| AssignedUserDto {
                    user_id: u.id,
                    username: u.username.clone(),
                    full_name: u.full_name.clone(),
                    avatar_color: u.avatar_color.clone(),
                    assigned_at: a.assigned_at,
                })
            })
            .collect();

        let tags = self
            .tags
            .find_by_task(task.id)
            .await?
            .into_iter()
            .map(TagDto::from)
            .collect();

        Ok(TaskDetailDto {
            task_id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            start_date: task.start_date,
            due_date: task.due_date,
            is_deleted: task.is_deleted,
            deleted_at: task.deleted_at,
            category_id: task.category_id,
            category_name,
            created_by_id: task.created_by,
            created_by_username,
            created_at: task.created_at,
            updated_at: task.updated_at,
            assigned_users,
            tags,
        })
    }
}

fn simple_dto(
    task: TaskModel,
    category_name: Option<String>,
    created_by_username: Option<String>,
) -> TaskSimpleDto {
    TaskSimpleDto {
        task_id: task.id,
        title: task.title,
        description: task.description,
        status: task.status,
        priority: task.priority,
        start_date: task.start_date,
        due_date: task.due_date,
        category_name,
        created_by_username,
        created_at: task.created_at,
        updated_at: task.updated_at,
        deleted_at: task.deleted_at,
    }
}

/// Blank or absent means "not supplied".
fn parse_optional<T: FromStr>(field: &str, raw: Option<String>) -> Result<Option<T>, ServiceError> {
    non_blank(raw)
        .map(|value| parse_enum(field, &value))
        .transpose()
}
