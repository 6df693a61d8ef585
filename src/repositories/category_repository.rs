use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TryIntoModel,
};
use std::sync::Arc;

use crate::entities::category::{
    ActiveModel as CategoryActiveModel, Column, Entity as Category, Model as CategoryModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<CategoryModel>, AppError> {
        Ok(Category::find()
            .order_by_asc(Column::Name)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<CategoryModel>, AppError> {
        Ok(Category::find_by_id(id).one(self.base.get_db()).await?)
    }

    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<CategoryModel>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(Category::find()
            .filter(Column::Id.is_in(ids))
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<CategoryModel>, AppError> {
        Ok(Category::find()
            .filter(Column::Name.eq(name))
            .one(self.base.get_db())
            .await?)
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool, AppError> {
        let count = Category::find()
            .filter(Column::Name.eq(name))
            .count(self.base.get_db())
            .await?;
        Ok(count > 0)
    }

    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: i32) -> Result<(), AppError> {
        Category::delete_by_id(id).exec(conn).await?;
        Ok(())
    }

    pub async fn save(&self, category: CategoryActiveModel) -> Result<CategoryModel, AppError> {
        Ok(category.save(self.base.get_db()).await?.try_into_model()?)
    }
}
