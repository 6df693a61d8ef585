use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_catalog_tables::Migration),
            Box::new(m20240101_000003_create_tasks_table::Migration),
            Box::new(m20240101_000004_create_task_relation_tables::Migration),
        ]
    }
}

mod m20240101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Email)
                                .string_len(100)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::FullName).string_len(100).not_null())
                        .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                        .col(ColumnDef::new(Users::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Users::AvatarColor).string_len(7).null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Username,
        Email,
        PasswordHash,
        FullName,
        Role,
        Status,
        AvatarColor,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::Name)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Categories::Color).string_len(7).null())
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Tags::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Tags::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Tags::Name)
                                .string_len(50)
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Tags::Color).string_len(7).null())
                        .col(
                            ColumnDef::new(Tags::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tags::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
        Name,
        Color,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Tags {
        Table,
        Id,
        Name,
        Color,
        CreatedAt,
    }
}

mod m20240101_000003_create_tasks_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_tasks_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tasks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Tasks::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Tasks::Title).string_len(200).not_null())
                        .col(ColumnDef::new(Tasks::Description).text().null())
                        .col(ColumnDef::new(Tasks::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Tasks::Priority).string_len(20).not_null())
                        .col(ColumnDef::new(Tasks::StartDate).date().null())
                        .col(ColumnDef::new(Tasks::DueDate).date().not_null())
                        .col(
                            ColumnDef::new(Tasks::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Tasks::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Tasks::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Tasks::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Tasks::CategoryId).integer().null())
                        .col(ColumnDef::new(Tasks::CreatedBy).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_category_id")
                                .from(Tasks::Table, Tasks::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_tasks_created_by")
                                .from(Tasks::Table, Tasks::CreatedBy)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tasks_status")
                        .table(Tasks::Table)
                        .col(Tasks::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tasks_is_deleted")
                        .table(Tasks::Table)
                        .col(Tasks::IsDeleted)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tasks::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Tasks {
        Table,
        Id,
        Title,
        Description,
        Status,
        Priority,
        StartDate,
        DueDate,
        IsDeleted,
        DeletedAt,
        CreatedAt,
        UpdatedAt,
        CategoryId,
        CreatedBy,
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }
}

mod m20240101_000004_create_task_relation_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_task_relation_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TaskTags::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(TaskTags::TaskId).integer().not_null())
                        .col(ColumnDef::new(TaskTags::TagId).integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(TaskTags::TaskId)
                                .col(TaskTags::TagId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_tags_task_id")
                                .from(TaskTags::Table, TaskTags::TaskId)
                                .to(Tasks::Table, Tasks::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_tags_tag_id")
                                .from(TaskTags::Table, TaskTags::TagId)
                                .to(Tags::Table, Tags::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TaskAssignments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TaskAssignments::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(TaskAssignments::TaskId).integer().not_null())
                        .col(ColumnDef::new(TaskAssignments::UserId).integer().not_null())
                        .col(
                            ColumnDef::new(TaskAssignments::AssignedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_assignments_task_id")
                                .from(TaskAssignments::Table, TaskAssignments::TaskId)
                                .to(Tasks::Table, Tasks::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_assignments_user_id")
                                .from(TaskAssignments::Table, TaskAssignments::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_task_assignments_task_user")
                        .table(TaskAssignments::Table)
                        .col(TaskAssignments::TaskId)
                        .col(TaskAssignments::UserId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TaskAttachments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TaskAttachments::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(TaskAttachments::TaskId).integer().not_null())
                        .col(
                            ColumnDef::new(TaskAttachments::FileName)
                                .string_len(255)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TaskAttachments::FilePath)
                                .string_len(500)
                                .not_null(),
                        )
                        .col(ColumnDef::new(TaskAttachments::FileSize).big_integer().null())
                        .col(ColumnDef::new(TaskAttachments::MimeType).string_len(100).null())
                        .col(
                            ColumnDef::new(TaskAttachments::UploadedBy)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TaskAttachments::UploadedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_attachments_task_id")
                                .from(TaskAttachments::Table, TaskAttachments::TaskId)
                                .to(Tasks::Table, Tasks::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_task_attachments_uploaded_by")
                                .from(TaskAttachments::Table, TaskAttachments::UploadedBy)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ActivityLog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ActivityLog::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ActivityLog::TaskId).integer().not_null())
                        .col(ColumnDef::new(ActivityLog::UserId).integer().not_null())
                        .col(ColumnDef::new(ActivityLog::ActionType).string_len(30).not_null())
                        .col(ColumnDef::new(ActivityLog::OldValue).text().null())
                        .col(ColumnDef::new(ActivityLog::NewValue).text().null())
                        .col(ColumnDef::new(ActivityLog::Description).string_len(500).null())
                        .col(
                            ColumnDef::new(ActivityLog::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_activity_log_task_id")
                                .from(ActivityLog::Table, ActivityLog::TaskId)
                                .to(Tasks::Table, Tasks::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_activity_log_user_id")
                                .from(ActivityLog::Table, ActivityLog::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_activity_log_task_id")
                        .table(ActivityLog::Table)
                        .col(ActivityLog::TaskId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ActivityLog::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TaskAttachments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TaskAssignments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(TaskTags::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum TaskTags {
        Table,
        TaskId,
        TagId,
    }

    #[derive(DeriveIden)]
    enum TaskAssignments {
        Table,
        Id,
        TaskId,
        UserId,
        AssignedAt,
    }

    #[derive(DeriveIden)]
    enum TaskAttachments {
        Table,
        Id,
        TaskId,
        FileName,
        FilePath,
        FileSize,
        MimeType,
        UploadedBy,
        UploadedAt,
    }

    #[derive(DeriveIden)]
    enum ActivityLog {
        Table,
        Id,
        TaskId,
        UserId,
        ActionType,
        OldValue,
        NewValue,
        Description,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Tasks {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Tags {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
    }
}
