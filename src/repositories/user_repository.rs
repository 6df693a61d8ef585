use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TryIntoModel,
};
use std::sync::Arc;

use crate::entities::user::{ActiveModel as UserActiveModel, Column, Entity as User, Model as UserModel};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for user rows
#[derive(Debug, Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> Result<Vec<UserModel>, AppError> {
        Ok(User::find()
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, AppError> {
        Ok(User::find_by_id(id).one(self.base.get_db()).await?)
    }

    /// Loads every user whose id is in `ids`; unknown ids are skipped.
    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<UserModel>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(User::find()
            .filter(Column::Id.is_in(ids))
            .all(self.base.get_db())
            .await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, AppError> {
        Ok(User::find()
            .filter(Column::Username.eq(username))
            .one(self.base.get_db())
            .await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        Ok(User::find()
            .filter(Column::Email.eq(email))
            .one(self.base.get_db())
            .await?)
    }

    pub async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        let count = User::find()
            .filter(Column::Username.eq(username))
            .count(self.base.get_db())
            .await?;
        Ok(count > 0)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let count = User::find()
            .filter(Column::Email.eq(email))
            .count(self.base.get_db())
            .await?;
        Ok(count > 0)
    }

    /// Inserts when the primary key is unset, updates the changed columns otherwise.
    pub async fn save(&self, user: UserActiveModel) -> Result<UserModel, AppError> {
        Ok(user.save(self.base.get_db()).await?.try_into_model()?)
    }
}
