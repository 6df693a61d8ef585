use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::{non_blank, require_text};
use crate::dto::{CategoryDto, CreateCategoryRequest, UpdateCategoryRequest};
use crate::entities::category::{self, Model as CategoryModel};
use crate::errors::ServiceError;
use crate::repositories::{CategoryRepository, TaskRepository};

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
    categories: CategoryRepository,
    tasks: TaskRepository,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            categories: CategoryRepository::new(db.clone()),
            tasks: TaskRepository::new(db.clone()),
            db,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryDto>, ServiceError> {
        Ok(self
            .categories
            .find_all()
            .await?
            .into_iter()
            .map(CategoryDto::from)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i32) -> Result<CategoryDto, ServiceError> {
        Ok(self.load(id).await?.into())
    }

    #[instrument(skip(self, input))]
    pub async fn create_category(
        &self,
        input: CreateCategoryRequest,
    ) -> Result<CategoryDto, ServiceError> {
        let name = require_text("name", &input.name)?;
        input.validate()?;
        if self.categories.exists_by_name(&name).await? {
            return Err(ServiceError::Conflict(format!(
                "Category {} already exists",
                name
            )));
        }

        let category = self
            .categories
            .save(category::ActiveModel {
                name: Set(name),
                color: Set(non_blank(input.color)),
                created_at: Set(Utc::now()),
                ..Default::default()
            })
            .await?;
        info!(category_id = category.id, "Category created");
        Ok(category.into())
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: i32,
        input: UpdateCategoryRequest,
    ) -> Result<CategoryDto, ServiceError> {
        input.validate()?;
        let existing = self.load(id).await?;
        let mut active = existing.clone().into_active_model();

        if let Some(name) = input.name {
            let name = require_text("name", &name)?;
            if name != existing.name {
                if self.categories.exists_by_name(&name).await? {
                    return Err(ServiceError::Conflict(format!(
                        "Category {} already exists",
                        name
                    )));
                }
                active.name = Set(name);
            }
        }
        if let Some(color) = non_blank(input.color) {
            active.color = Set(Some(color));
        }

        if !active.is_changed() {
            return Ok(existing.into());
        }
        Ok(self.categories.save(active).await?.into())
    }

    /// Deletes the category; tasks that used it are left uncategorised.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i32) -> Result<(), ServiceError> {
        self.load(id).await?;

        let txn = self.db.begin().await?;
        let detached = self.tasks.clear_category(&txn, id).await?;
        self.categories.delete(&txn, id).await?;
        txn.commit().await?;

        info!(category_id = id, detached, "Category deleted");
        Ok(())
    }

    async fn load(&self, id: i32) -> Result<CategoryModel, ServiceError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))
    }
}
