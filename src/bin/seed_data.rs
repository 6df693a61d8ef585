//! Seed data script - populates the board with demo data
//!
//! Run with: cargo run --bin seed-data -- --database-url sqlite://taskboard.db?mode=rwc
//!
//! This creates:
//! - 4 users (one group leader, three members)
//! - 3 categories and 4 tags
//! - 8 tasks spread over every status, with assignees and tags
//!
//! Everything goes through the services, so the activity log is filled too.

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use task_manager_api::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Populate the task board with demo data")]
struct Args {
    /// Database to seed
    #[arg(long, default_value = "sqlite://taskboard.db?mode=rwc")]
    database_url: String,

    /// Password given to every demo user
    #[arg(long, default_value = "changeme123")]
    password: String,

    /// Skip running migrations before seeding
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    info!("=== Task Board Seed Data ===");

    info!("Connecting to database: {}", args.database_url);
    let pool = db::establish_connection(&args.database_url)
        .await
        .context("failed to connect to the database")?;
    if !args.skip_migrations {
        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
    }
    let pool = Arc::new(pool);

    let users = UserService::new(pool.clone());
    let categories = CategoryService::new(pool.clone());
    let tags = TagService::new(pool.clone());
    let tasks = TaskService::new(pool);

    info!("Creating users...");
    let mut user_ids = Vec::new();
    for (username, full_name, role) in [
        ("alice", "Alice Moreau", "GROUP_LEADER"),
        ("bob", "Bob Lindqvist", "MEMBER"),
        ("carol", "Carol Nakamura", "MEMBER"),
        ("dave", "Dave Okafor", "MEMBER"),
    ] {
        let user = users
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{}@taskboard.local", username),
                password: args.password.clone(),
                full_name: full_name.to_string(),
                role: Some(role.to_string()),
                avatar_color: None,
            })
            .await
            .with_context(|| format!("failed to create user {}", username))?;
        user_ids.push(user.user_id);
    }
    info!("  Created {} users", user_ids.len());

    info!("Creating categories and tags...");
    let mut category_ids = Vec::new();
    for (name, color) in [
        ("Engineering", "#5B8DEF"),
        ("Design", "#9F7AEA"),
        ("Operations", "#48BB78"),
    ] {
        let category = categories
            .create_category(CreateCategoryRequest {
                name: name.to_string(),
                color: Some(color.to_string()),
            })
            .await?;
        category_ids.push(category.category_id);
    }
    let mut tag_ids = Vec::new();
    for (name, color) in [
        ("bug", "#F56565"),
        ("feature", "#5ECFB1"),
        ("chore", "#F5A864"),
        ("blocked", "#F56565"),
    ] {
        let tag = tags
            .create_tag(CreateTagRequest {
                name: name.to_string(),
                color: Some(color.to_string()),
            })
            .await?;
        tag_ids.push(tag.tag_id);
    }
    info!(
        "  Created {} categories and {} tags",
        category_ids.len(),
        tag_ids.len()
    );

    info!("Creating tasks...");
    let today = Utc::now().date_naive();
    let demo_tasks = [
        ("Set up CI pipeline", "TO_DO", "HIGH", 0, 3),
        ("Fix login redirect loop", "IN_PROGRESS", "URGENT", 0, 1),
        ("Draft onboarding screens", "PENDING", "MEDIUM", 1, 10),
        ("Pick a colour palette", "DONE", "LOW", 1, -2),
        ("Rotate database credentials", "TO_DO", "HIGH", 2, 5),
        ("Write API reference", "PENDING", "MEDIUM", 0, 14),
        ("Archive old invoices", "DONE", "LOW", 2, -7),
        ("Load test the board", "IN_PROGRESS", "MEDIUM", 0, 7),
    ];
    for (i, (title, status, priority, category, due_in_days)) in demo_tasks.into_iter().enumerate() {
        let creator = user_ids[i % user_ids.len()];
        let task = tasks
            .create_task(CreateTaskRequest {
                title: title.to_string(),
                description: Some(format!("Demo task: {}", title.to_lowercase())),
                status: None,
                priority: Some(priority.to_string()),
                start_date: Some(today - Duration::days(1)),
                due_date: Some(today + Duration::days(due_in_days)),
                category_id: Some(category_ids[category]),
                created_by_id: Some(creator),
            })
            .await
            .with_context(|| format!("failed to create task {}", title))?;

        // Move through update so the history shows the status change.
        if status != "PENDING" {
            tasks
                .update_task(
                    task.task_id,
                    UpdateTaskRequest {
                        status: Some(status.to_string()),
                        ..Default::default()
                    },
                    Some(creator),
                )
                .await?;
        }

        let assignee = user_ids[(i + 1) % user_ids.len()];
        tasks
            .assign_user(task.task_id, assignee, Some(creator))
            .await?;
        tasks
            .add_tag(task.task_id, tag_ids[i % tag_ids.len()])
            .await?;
    }
    info!("  Created {} tasks", demo_tasks.len());

    info!("=== Seed Data Complete ===");
    info!("Demo users log in with the password passed via --password");
    info!("Try these API calls:");
    info!("  curl http://localhost:8080/api/tasks");
    info!("  curl http://localhost:8080/api/tasks/by-status/IN_PROGRESS");
    info!("  curl http://localhost:8080/api/users");
    info!("Or open the board at http://localhost:8080/");

    Ok(())
}
