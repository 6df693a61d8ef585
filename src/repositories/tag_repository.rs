use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TryIntoModel,
};
use std::sync::Arc;

use crate::entities::tag::{
    ActiveModel as TagActiveModel, Column, Entity as Tag, Model as TagModel, Relation,
};
use crate::entities::task_tag;
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for tags and the `task_tags` join table
#[derive(Debug, Clone)]
pub struct TagRepository {
    base: BaseRepository,
}

impl TagRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<TagModel>, AppError> {
        Ok(Tag::find()
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<TagModel>, AppError> {
        Ok(Tag::find_by_id(id).one(self.base.get_db()).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<TagModel>, AppError> {
        Ok(Tag::find()
            .filter(Column::Name.eq(name))
            .one(self.base.get_db())
            .await?)
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        let count = Tag::find()
            .filter(Column::Name.eq(name))
            .count(self.base.get_db())
            .await?;
        Ok(count > 0)
    }

    pub async fn save(&self, tag: TagActiveModel) -> Result<TagModel, AppError> {
        Ok(tag.save(self.base.get_db()).await?.try_into_model()?)
    }

    /// Tags linked to `task_id`, by name.
    pub async fn find_by_task(&self, task_id: i32) -> Result<Vec<TagModel>, AppError> {
        Ok(Tag::find()
            .join(JoinType::InnerJoin, Relation::TaskTags.def())
            .filter(task_tag::Column::TaskId.eq(task_id))
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn is_linked(&self, task_id: i32, tag_id: i32) -> Result<bool, AppError> {
        Ok(task_tag::Entity::find_by_id((task_id, tag_id))
            .one(self.base.get_db())
            .await?
            .is_some())
    }

    pub async fn link(&self, task_id: i32, tag_id: i32) -> Result<(), AppError> {
        task_tag::ActiveModel {
            task_id: Set(task_id),
            tag_id: Set(tag_id),
        }
        .insert(self.base.get_db())
        .await?;
        Ok(())
    }

    pub async fn unlink_task<C: ConnectionTrait>(
        &self,
        conn: &C,
        task_id: i32,
    ) -> Result<u64, AppError> {
        let result = task_tag::Entity::delete_many()
            .filter(task_tag::Column::TaskId.eq(task_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn unlink_tag<C: ConnectionTrait>(
        &self,
        conn: &C,
        tag_id: i32,
    ) -> Result<u64, AppError> {
        let result = task_tag::Entity::delete_many()
            .filter(task_tag::Column::TagId.eq(tag_id))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), AppError> {
        Tag::delete_by_id(id).exec(conn).await?;
        Ok(())
    }

    /// Returns whether a link was removed.
    pub async fn unlink(&self, task_id: i32, tag_id: i32) -> Result<bool, AppError> {
        let result = task_tag::Entity::delete_by_id((task_id, tag_id))
            .exec(self.base.get_db())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
