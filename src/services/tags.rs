use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::{non_blank, require_text};
use crate::dto::{CreateTagRequest, TagDto};
use crate::entities::tag;
use crate::errors::ServiceError;
use crate::repositories::TagRepository;

#[derive(Clone)]
pub struct TagService {
    db: Arc<DatabaseConnection>,
    tags: TagRepository,
}

impl TagService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            tags: TagRepository::new(db.clone()),
            db,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_tags(&self) -> Result<Vec<TagDto>, ServiceError> {
        Ok(self
            .tags
            .find_all()
            .await?
            .into_iter()
            .map(TagDto::from)
            .collect())
    }

    #[instrument(skip(self, input))]
    pub async fn create_tag(&self, input: CreateTagRequest) -> Result<TagDto, ServiceError> {
        let name = require_text("name", &input.name)?;
        input.validate()?;
        if self.tags.exists_by_name(&name).await? {
            return Err(ServiceError::Conflict(format!("Tag {} already exists", name)));
        }

        let tag = self
            .tags
            .save(tag::ActiveModel {
                name: Set(name),
                color: Set(non_blank(input.color)),
                created_at: Set(Utc::now()),
                ..Default::default()
            })
            .await?;
        info!(tag_id = tag.id, "Tag created");
        Ok(tag.into())
    }

    /// Deletes the tag along with every task link to it.
    #[instrument(skip(self))]
    pub async fn delete_tag(&self, id: i32) -> Result<(), ServiceError> {
        if self.tags.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("Tag", id));
        }

        let txn = self.db.begin().await?;
        let links = self.tags.unlink_tag(&txn, id).await?;
        self.tags.delete(&txn, id).await?;
        txn.commit().await?;

        info!(tag_id = id, links, "Tag deleted");
        Ok(())
    }
}
