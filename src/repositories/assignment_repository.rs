use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use crate::entities::task_assignment::{
    ActiveModel as AssignmentActiveModel, Column, Entity as Assignment, Model as AssignmentModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    base: BaseRepository,
}

impl AssignmentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_task(&self, task_id: i32) -> Result<Vec<AssignmentModel>, AppError> {
        Ok(Assignment::find()
            .filter(Column::TaskId.eq(task_id))
            .order_by_asc(Column::AssignedAt)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_task_and_user(
        &self,
        task_id: i32,
        user_id: i32,
    ) -> Result<Option<AssignmentModel>, AppError> {
        Ok(Assignment::find()
            .filter(Column::TaskId.eq(task_id))
            .filter(Column::UserId.eq(user_id))
            .one(self.base.get_db())
            .await?)
    }

    pub async fn exists_by_task_and_user(&self, task_id: i32, user_id: i32) -> Result<bool, AppError> {
        Ok(self.find_by_task_and_user(task_id, user_id).await?.is_some())
    }

    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        assignment: AssignmentActiveModel,
    ) -> Result<AssignmentModel, AppError> {
        Ok(assignment.insert(conn).await?)
    }

    pub async fn delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        assignment: AssignmentModel,
    ) -> Result<(), AppError> {
        assignment.delete(conn).await?;
        Ok(())
    }

    pub async fn delete_by_task<C: ConnectionTrait>(
        &self,
        conn: &C,
        task_id: i32,
    ) -> Result<u64, AppError> {
        let result = Assignment::delete_many()
            .filter(Column::TaskId.eq(task_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
