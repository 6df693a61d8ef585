//! Server-rendered board pages and the form posts behind them.
//!
//! Pages read through the same services as the REST API. Form posts redirect
//! back to the page they came from, carrying `?error=` when the service
//! rejected the input.

pub mod templates;

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use self::templates::{enum_options, fill, html_escape, humanize, id_options, render_page, Nav};
use crate::dto::{CreateTaskRequest, CreateUserRequest, TaskSimpleDto, UpdateTaskRequest, UserDto};
use crate::entities::{TaskPriority, TaskStatus, UserRole};
use crate::errors::ServiceError;
use crate::AppState;

const RECENT_TASKS: usize = 5;

pub fn web_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_page))
        .route("/tasks", get(tasks_page))
        .route("/users", get(users_page))
        .route("/users/create", post(create_user))
        .route("/tasks/create", post(create_task))
        .route("/tasks/update-status/:id", post(update_status))
        .route("/tasks/update-priority/:id", post(update_priority))
        .route("/tasks/delete/:id", post(delete_task))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    title: String,
    description: String,
    status: String,
    priority: String,
    start_date: String,
    due_date: String,
    category_id: String,
    created_by_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    username: String,
    email: String,
    password: String,
    full_name: String,
    role: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PriorityForm {
    priority: String,
}

async fn home_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, ServiceError> {
    let tasks = state.services.tasks.list_active().await?;
    let users = state.services.users.list_users().await?;

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for task in &tasks {
        *counts.entry(task.status.to_string()).or_default() += 1;
    }
    let stats: String = [
        TaskStatus::Pending,
        TaskStatus::ToDo,
        TaskStatus::InProgress,
        TaskStatus::Done,
    ]
    .iter()
    .map(|status| {
        let key = status.to_string();
        format!(
            r#"<div class="stat"><strong>{}</strong>{}</div>"#,
            counts.get(&key).copied().unwrap_or(0),
            humanize(&key)
        )
    })
    .collect();

    let mut recent: Vec<&TaskSimpleDto> = tasks.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_tasks: String = recent
        .into_iter()
        .take(RECENT_TASKS)
        .map(|task| {
            format!(
                "<tr><td>{}</td><td><span class=\"badge\">{}</span></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&task.title),
                humanize(&task.status.to_string()),
                humanize(&task.priority.to_string()),
                task.due_date,
                html_escape(task.created_by_username.as_deref().unwrap_or("")),
            )
        })
        .collect();
    let team = users
        .iter()
        .map(avatar)
        .collect::<Vec<_>>()
        .join(" ");

    let content = fill(
        templates::INDEX_TEMPLATE,
        &[
            ("stats", stats.as_str()),
            ("recent_tasks", recent_tasks.as_str()),
            ("team", team.as_str()),
        ],
    );
    Ok(Html(render_page(
        "Dashboard",
        Nav::Home,
        query.error.as_deref(),
        &content,
    )))
}

async fn tasks_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, ServiceError> {
    let tasks = state.services.tasks.list_active().await?;
    let users = state.services.users.list_users().await?;
    let categories = state.services.categories.list_categories().await?;

    let task_rows: String = tasks.iter().map(task_row).collect();
    let content = fill(
        templates::TASKS_TEMPLATE,
        &[
            ("task_rows", task_rows.as_str()),
            ("status_options", enum_options(Some(TaskStatus::default())).as_str()),
            ("priority_options", enum_options(Some(TaskPriority::default())).as_str()),
            (
                "category_options",
                id_options(categories.iter().map(|c| (c.category_id, c.name.as_str())))
                    .as_str(),
            ),
            (
                "user_options",
                id_options(users.iter().map(|u| (u.user_id, u.username.as_str())))
                    .as_str(),
            ),
        ],
    );
    Ok(Html(render_page(
        "Tasks",
        Nav::Tasks,
        query.error.as_deref(),
        &content,
    )))
}

async fn users_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, ServiceError> {
    let users = state.services.users.list_users().await?;
    let user_rows: String = users
        .iter()
        .map(|user| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><span class=\"badge\">{}</span></td></tr>",
                avatar(user),
                html_escape(&user.username),
                html_escape(&user.full_name),
                html_escape(&user.email),
                humanize(&user.role.to_string()),
                humanize(&user.status.to_string()),
            )
        })
        .collect();
    let content = fill(
        templates::USERS_TEMPLATE,
        &[
            ("user_rows", user_rows.as_str()),
            ("role_options", enum_options(Some(UserRole::Member)).as_str()),
        ],
    );
    Ok(Html(render_page(
        "Users",
        Nav::Users,
        query.error.as_deref(),
        &content,
    )))
}

async fn create_task(State(state): State<AppState>, Form(form): Form<TaskForm>) -> Redirect {
    let request = match task_request(form) {
        Ok(request) => request,
        Err(e) => return rejected("/tasks", e),
    };
    match state.services.tasks.create_task(request).await {
        Ok(task) => {
            info!(task_id = task.task_id, "Task created from board");
            Redirect::to("/tasks")
        }
        Err(e) => rejected("/tasks", e),
    }
}

async fn create_user(State(state): State<AppState>, Form(form): Form<UserForm>) -> Redirect {
    let request = CreateUserRequest {
        username: form.username,
        email: form.email,
        password: form.password,
        full_name: form.full_name,
        role: blank_to_none(form.role),
        avatar_color: None,
    };
    match state.services.users.create_user(request).await {
        Ok(user) => {
            info!(user_id = user.user_id, "User created from board");
            Redirect::to("/users")
        }
        Err(e) => rejected("/users", e),
    }
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Redirect {
    let request = UpdateTaskRequest {
        status: Some(form.status),
        ..Default::default()
    };
    match state.services.tasks.update_task(id, request, None).await {
        Ok(_) => Redirect::to("/tasks"),
        Err(e) => rejected("/tasks", e),
    }
}

async fn update_priority(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<PriorityForm>,
) -> Redirect {
    let request = UpdateTaskRequest {
        priority: Some(form.priority),
        ..Default::default()
    };
    match state.services.tasks.update_task(id, request, None).await {
        Ok(_) => Redirect::to("/tasks"),
        Err(e) => rejected("/tasks", e),
    }
}

async fn delete_task(State(state): State<AppState>, Path(id): Path<i32>) -> Redirect {
    match state.services.tasks.soft_delete(id, None).await {
        Ok(()) => Redirect::to("/tasks"),
        Err(e) => rejected("/tasks", e),
    }
}

fn rejected(page: &str, err: ServiceError) -> Redirect {
    warn!(page, error = %err, "Board form rejected");
    Redirect::to(&format!(
        "{}?error={}",
        page,
        urlencoding::encode(&err.response_message())
    ))
}

/// Turns the string-only form into a typed request; blank fields mean "not supplied".
fn task_request(form: TaskForm) -> Result<CreateTaskRequest, ServiceError> {
    Ok(CreateTaskRequest {
        title: form.title,
        description: blank_to_none(form.description),
        status: blank_to_none(form.status),
        priority: blank_to_none(form.priority),
        start_date: parse_date("start_date", form.start_date)?,
        due_date: parse_date("due_date", form.due_date)?,
        category_id: parse_id("category_id", form.category_id)?,
        created_by_id: parse_id("created_by_id", form.created_by_id)?,
    })
}

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_date(field: &str, value: String) -> Result<Option<NaiveDate>, ServiceError> {
    blank_to_none(value)
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| ServiceError::InvalidInput(format!("Invalid {}: {}", field, raw)))
        })
        .transpose()
}

fn parse_id(field: &str, value: String) -> Result<Option<i32>, ServiceError> {
    blank_to_none(value)
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| ServiceError::InvalidInput(format!("Invalid {}: {}", field, raw)))
        })
        .transpose()
}

fn task_row(task: &TaskSimpleDto) -> String {
    let id = task.task_id;
    format!(
        concat!(
            "<tr><td>{title}</td><td>{category}</td>",
            "<td><form class=\"inline\" method=\"post\" action=\"/tasks/update-status/{id}\">",
            "<select name=\"status\" onchange=\"this.form.submit()\">{statuses}</select></form></td>",
            "<td><form class=\"inline\" method=\"post\" action=\"/tasks/update-priority/{id}\">",
            "<select name=\"priority\" onchange=\"this.form.submit()\">{priorities}</select></form></td>",
            "<td>{due}</td><td>{owner}</td>",
            "<td><form class=\"inline\" method=\"post\" action=\"/tasks/delete/{id}\">",
            "<button type=\"submit\">Delete</button></form></td></tr>"
        ),
        title = html_escape(&task.title),
        category = html_escape(task.category_name.as_deref().unwrap_or("")),
        id = id,
        statuses = enum_options(Some(task.status)),
        priorities = enum_options(Some(task.priority)),
        due = task.due_date,
        owner = html_escape(task.created_by_username.as_deref().unwrap_or("")),
    )
}

fn avatar(user: &UserDto) -> String {
    let initial = user
        .full_name
        .chars()
        .next()
        .or_else(|| user.username.chars().next())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    format!(
        r#"<span class="avatar" style="background: {}" title="{}">{}</span>"#,
        html_escape(user.avatar_color.as_deref().unwrap_or("#7b8794")),
        html_escape(&user.username),
        html_escape(&initial),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn blank_form_fields_become_absent() {
        let request = task_request(TaskForm {
            title: "Write docs".into(),
            due_date: "2024-06-01".into(),
            created_by_id: "3".into(),
            category_id: "  ".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(request.due_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(request.created_by_id, Some(3));
        assert_eq!(request.category_id, None);
        assert_eq!(request.status, None);
        assert_eq!(request.start_date, None);
    }

    #[test]
    fn malformed_form_values_are_invalid_input() {
        let bad_date = task_request(TaskForm {
            due_date: "06/01/2024".into(),
            ..Default::default()
        });
        assert_matches!(bad_date, Err(ServiceError::InvalidInput(_)));

        let bad_id = task_request(TaskForm {
            created_by_id: "abc".into(),
            ..Default::default()
        });
        assert_matches!(bad_id, Err(ServiceError::InvalidInput(_)));
    }
}
