use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TryIntoModel,
};
use std::sync::Arc;

use crate::entities::task::{
    ActiveModel as TaskActiveModel, Column, Entity as Task, Model as TaskModel, TaskStatus,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for task rows
#[derive(Debug, Clone)]
pub struct TaskRepository {
    base: BaseRepository,
}

impl TaskRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Every task, deleted or not.
    pub async fn find_all(&self) -> Result<Vec<TaskModel>, AppError> {
        Ok(Task::find()
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<TaskModel>, AppError> {
        Ok(Task::find_by_id(id).one(self.base.get_db()).await?)
    }

    pub async fn find_by_is_deleted(&self, is_deleted: bool) -> Result<Vec<TaskModel>, AppError> {
        Ok(Task::find()
            .filter(Column::IsDeleted.eq(is_deleted))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    /// Non-deleted tasks in `status`.
    pub async fn find_active_by_status(
        &self,
        status: TaskStatus,
    ) -> Result<Vec<TaskModel>, AppError> {
        Ok(Task::find()
            .filter(Column::Status.eq(status))
            .filter(Column::IsDeleted.eq(false))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn exists_by_id(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Inserts when the primary key is unset, updates the changed columns otherwise.
    pub async fn save<C: ConnectionTrait>(
        &self,
        conn: &C,
        task: TaskActiveModel,
    ) -> Result<TaskModel, AppError> {
        Ok(task.save(conn).await?.try_into_model()?)
    }

    /// Detaches every task from `category_id`.
    pub async fn clear_category<C: ConnectionTrait>(
        &self,
        conn: &C,
        category_id: i32,
    ) -> Result<u64, AppError> {
        let result = Task::update_many()
            .col_expr(Column::CategoryId, Expr::value(Option::<i32>::None))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::CategoryId.eq(category_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), AppError> {
        Task::delete_by_id(id).exec(conn).await?;
        Ok(())
    }
}
