use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use std::sync::Arc;

use crate::entities::task_attachment::{
    ActiveModel as AttachmentActiveModel, Column, Entity as Attachment, Model as AttachmentModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

#[derive(Debug, Clone)]
pub struct AttachmentRepository {
    base: BaseRepository,
}

impl AttachmentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_task(&self, task_id: i32) -> Result<Vec<AttachmentModel>, AppError> {
        Ok(Attachment::find()
            .filter(Column::TaskId.eq(task_id))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<AttachmentModel>, AppError> {
        Ok(Attachment::find_by_id(id).one(self.base.get_db()).await?)
    }

    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        attachment: AttachmentActiveModel,
    ) -> Result<AttachmentModel, AppError> {
        Ok(attachment.insert(conn).await?)
    }

    pub async fn delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        attachment: AttachmentModel,
    ) -> Result<(), AppError> {
        attachment.delete(conn).await?;
        Ok(())
    }

    pub async fn delete_by_task<C: ConnectionTrait>(
        &self,
        conn: &C,
        task_id: i32,
    ) -> Result<u64, AppError> {
        let result = Attachment::delete_many()
            .filter(Column::TaskId.eq(task_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}
