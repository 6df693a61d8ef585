mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{assert_status, body_json, id_of, TestApp};

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .map(|tasks| tasks.iter().map(|t| id_of(t, "taskId")).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn created_task_moves_from_board_to_trash() {
    let app = TestApp::new().await;
    let user = app.create_user("writer").await;
    let user_id = id_of(&user, "userId");

    let task = app
        .json(
            Method::POST,
            "/api/tasks",
            Some(json!({
                "title": "Write proposal",
                "dueDate": "2024-06-01",
                "createdById": user_id,
            })),
            StatusCode::CREATED,
        )
        .await;
    let task_id = id_of(&task, "taskId");
    assert_eq!(task["status"], "PENDING");
    assert_eq!(task["priority"], "MEDIUM");
    assert_eq!(task["createdByUsername"], "writer");
    assert_eq!(task["isDeleted"], false);
    assert_eq!(task["assignedUsers"], json!([]));
    assert_eq!(task["tags"], json!([]));

    let active = app.json(Method::GET, "/api/tasks", None, StatusCode::OK).await;
    assert!(ids(&active).contains(&task_id));

    let response = app
        .request(Method::DELETE, &format!("/api/tasks/{}", task_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::Null);

    let active = app.json(Method::GET, "/api/tasks", None, StatusCode::OK).await;
    assert!(!ids(&active).contains(&task_id));
    let trash = app.json(Method::GET, "/api/trash", None, StatusCode::OK).await;
    assert!(ids(&trash).contains(&task_id));
    assert!(trash[0]["deletedAt"].is_string());
}

#[tokio::test]
async fn restore_returns_task_to_active_list() {
    let app = TestApp::new().await;
    let user_id = id_of(&app.create_user("keeper").await, "userId");
    let task_id = id_of(&app.create_task("Restore me", user_id).await, "taskId");

    app.request(Method::DELETE, &format!("/api/tasks/{}", task_id), None)
        .await;
    let restored = app
        .json(
            Method::PUT,
            &format!("/api/tasks/{}/restore", task_id),
            None,
            StatusCode::OK,
        )
        .await;
    assert_eq!(restored["isDeleted"], false);
    assert!(restored.get("deletedAt").map_or(true, Value::is_null));

    let active = app.json(Method::GET, "/api/tasks", None, StatusCode::OK).await;
    assert!(ids(&active).contains(&task_id));
    let trash = app.json(Method::GET, "/api/trash", None, StatusCode::OK).await;
    assert!(!ids(&trash).contains(&task_id));

    let actions: Vec<Value> = app
        .activity(task_id)
        .await
        .into_iter()
        .map(|entry| entry["actionType"].clone())
        .collect();
    assert_eq!(actions, vec![json!("CREATED"), json!("DELETED"), json!("RESTORED")]);
}

#[tokio::test]
async fn soft_delete_twice_keeps_task_in_trash() {
    let app = TestApp::new().await;
    let user_id = id_of(&app.create_user("twice").await, "userId");
    let task_id = id_of(&app.create_task("Delete twice", user_id).await, "taskId");

    for _ in 0..2 {
        let response = app
            .request(Method::DELETE, &format!("/api/tasks/{}", task_id), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let trash = app.json(Method::GET, "/api/trash", None, StatusCode::OK).await;
    assert_eq!(ids(&trash), vec![task_id]);
}

#[tokio::test]
async fn status_only_update_leaves_other_fields_alone() {
    let app = TestApp::new().await;
    let user_id = id_of(&app.create_user("editor").await, "userId");
    let created = app
        .json(
            Method::POST,
            "/api/tasks",
            Some(json!({
                "title": "Partial",
                "description": "keep me",
                "priority": "HIGH",
                "dueDate": "2024-07-15",
                "createdById": user_id,
            })),
            StatusCode::CREATED,
        )
        .await;
    let task_id = id_of(&created, "taskId");

    let updated = app
        .json(
            Method::PUT,
            &format!("/api/tasks/{}", task_id),
            Some(json!({ "status": "IN_PROGRESS" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(updated["status"], "IN_PROGRESS");
    assert_eq!(updated["title"], "Partial");
    assert_eq!(updated["description"], "keep me");
    assert_eq!(updated["priority"], "HIGH");
    assert_eq!(updated["dueDate"], "2024-07-15");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn status_change_is_logged_with_old_and_new_values() {
    let app = TestApp::new().await;
    let owner = id_of(&app.create_user("owner").await, "userId");
    let helper = id_of(&app.create_user("helper").await, "userId");
    let task_id = id_of(&app.create_task("Track me", owner).await, "taskId");

    let response = app
        .request_with_headers(
            Method::PUT,
            &format!("/api/tasks/{}", task_id),
            Some(json!({ "status": "done", "title": "Tracked" })),
            &[("x-actor-id", &helper.to_string())],
        )
        .await;
    assert_status(response, StatusCode::OK).await;

    let entries = app.activity(task_id).await;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["actionType"], "CREATED");
    assert_eq!(entries[0]["username"], "owner");

    let status_entry = &entries[1];
    assert_eq!(status_entry["actionType"], "STATUS_CHANGED");
    assert_eq!(status_entry["oldValue"], "PENDING");
    assert_eq!(status_entry["newValue"], "DONE");
    assert_eq!(status_entry["username"], "helper");

    assert_eq!(entries[2]["actionType"], "UPDATED");
    assert_eq!(entries[2]["description"], "Updated title");
}

#[tokio::test]
async fn unknown_actor_is_rejected() {
    let app = TestApp::new().await;
    let owner = id_of(&app.create_user("solo").await, "userId");
    let task_id = id_of(&app.create_task("Guarded", owner).await, "taskId");

    let response = app
        .request_with_headers(
            Method::DELETE,
            &format!("/api/tasks/{}", task_id),
            None,
            &[("x-actor-id", "9999")],
        )
        .await;
    assert_status(response, StatusCode::BAD_REQUEST).await;

    let response = app
        .request_with_headers(
            Method::DELETE,
            &format!("/api/tasks/{}", task_id),
            None,
            &[("x-actor-id", "not-a-number")],
        )
        .await;
    assert_status(response, StatusCode::BAD_REQUEST).await;

    let active = app.json(Method::GET, "/api/tasks", None, StatusCode::OK).await;
    assert!(ids(&active).contains(&task_id));
}

#[tokio::test]
async fn purge_requires_trash_and_removes_everything() {
    let app = TestApp::new().await;
    let owner = id_of(&app.create_user("purger").await, "userId");
    let assignee = id_of(&app.create_user("assignee").await, "userId");
    let tag_id = id_of(&app.create_tag("cleanup").await, "tagId");
    let task_id = id_of(&app.create_task("Purge me", owner).await, "taskId");

    app.json(
        Method::POST,
        &format!("/api/tasks/{}/assignments", task_id),
        Some(json!({ "userId": assignee })),
        StatusCode::CREATED,
    )
    .await;
    app.json(
        Method::POST,
        &format!("/api/tasks/{}/tags", task_id),
        Some(json!({ "tagId": tag_id })),
        StatusCode::OK,
    )
    .await;
    app.json(
        Method::POST,
        &format!("/api/tasks/{}/attachments", task_id),
        Some(json!({ "fileName": "notes.txt", "filePath": "/files/notes.txt", "fileSize": 12 })),
        StatusCode::CREATED,
    )
    .await;

    let response = app
        .request(Method::DELETE, &format!("/api/trash/{}", task_id), None)
        .await;
    assert_status(response, StatusCode::CONFLICT).await;

    app.request(Method::DELETE, &format!("/api/tasks/{}", task_id), None)
        .await;
    let response = app
        .request(Method::DELETE, &format!("/api/trash/{}", task_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for uri in [
        format!("/api/tasks/{}", task_id),
        format!("/api/tasks/{}/activity", task_id),
        format!("/api/tasks/{}/attachments", task_id),
    ] {
        let response = app.request(Method::GET, &uri, None).await;
        assert_status(response, StatusCode::NOT_FOUND).await;
    }

    let trash = app.json(Method::GET, "/api/trash", None, StatusCode::OK).await;
    assert!(ids(&trash).is_empty());

    // The tag itself survives; only the link went away.
    let tags = app.json(Method::GET, "/api/tags", None, StatusCode::OK).await;
    assert_eq!(tags.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn missing_task_is_not_found() {
    let app = TestApp::new().await;
    let body = app
        .json(Method::GET, "/api/tasks/4242", None, StatusCode::NOT_FOUND)
        .await;
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().unwrap().contains("Task 4242 not found"));
    assert!(body["requestId"].is_string());
}
