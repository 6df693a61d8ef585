//! Pass-through persistence accessors, one per entity. No business rules live here.
//!
//! Write methods on the task-side repositories take the connection explicitly, so a
//! service can run them on a `DatabaseTransaction` together with the activity entry.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod activity_log_repository;
pub mod assignment_repository;
pub mod attachment_repository;
pub mod category_repository;
pub mod tag_repository;
pub mod task_repository;
pub mod user_repository;

pub use activity_log_repository::ActivityLogRepository;
pub use assignment_repository::AssignmentRepository;
pub use attachment_repository::AttachmentRepository;
pub use category_repository::CategoryRepository;
pub use tag_repository::TagRepository;
pub use task_repository::TaskRepository;
pub use user_repository::UserRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
