use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;

use crate::entities::activity_log::{
    ActiveModel as ActivityActiveModel, Column, Entity as ActivityLog, Model as ActivityModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Append-only: entries are inserted and read, never updated.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    base: BaseRepository,
}

impl ActivityLogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Entries for `task_id`, oldest first.
    pub async fn find_by_task(&self, task_id: i32) -> Result<Vec<ActivityModel>, AppError> {
        Ok(ActivityLog::find()
            .filter(Column::TaskId.eq(task_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn append<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry: ActivityActiveModel,
    ) -> Result<ActivityModel, AppError> {
        Ok(entry.insert(conn).await?)
    }

    pub async fn delete_by_task<C: ConnectionTrait>(
        &self,
        conn: &C,
        task_id: i32,
    ) -> Result<u64, AppError> {
        let result = ActivityLog::delete_many()
            .filter(Column::TaskId.eq(task_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
