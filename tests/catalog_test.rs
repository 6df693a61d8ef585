mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{assert_status, id_of, TestApp};

#[tokio::test]
async fn categories_crud_with_unique_names() {
    let app = TestApp::new().await;
    let category = app.create_category("Backend").await;
    let category_id = id_of(&category, "categoryId");
    assert_eq!(category["color"], "#5B8DEF");

    let response = app
        .request(
            Method::POST,
            "/api/categories",
            Some(json!({ "name": "Backend" })),
        )
        .await;
    assert_status(response, StatusCode::CONFLICT).await;

    let response = app
        .request(Method::POST, "/api/categories", Some(json!({ "name": " " })))
        .await;
    assert_status(response, StatusCode::BAD_REQUEST).await;

    let updated = app
        .json(
            Method::PUT,
            &format!("/api/categories/{}", category_id),
            Some(json!({ "name": "Platform", "color": "#48BB78" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(updated["name"], "Platform");
    assert_eq!(updated["color"], "#48BB78");

    app.create_category("Frontend").await;
    let response = app
        .request(
            Method::PUT,
            &format!("/api/categories/{}", category_id),
            Some(json!({ "name": "Frontend" })),
        )
        .await;
    assert_status(response, StatusCode::CONFLICT).await;

    let listed = app
        .json(Method::GET, "/api/categories", None, StatusCode::OK)
        .await;
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Frontend", "Platform"]);
}

#[tokio::test]
async fn category_update_without_changes_returns_stored_row() {
    let app = TestApp::new().await;
    let category = app.create_category("Ops").await;
    let uri = format!("/api/categories/{}", id_of(&category, "categoryId"));

    let unchanged = app
        .json(Method::PUT, &uri, Some(json!({})), StatusCode::OK)
        .await;
    assert_eq!(unchanged["categoryId"], category["categoryId"]);
    assert_eq!(unchanged["name"], "Ops");
    assert_eq!(unchanged["color"], category["color"]);

    // Resubmitting the current name is not a conflict with itself.
    let renamed = app
        .json(
            Method::PUT,
            &uri,
            Some(json!({ "name": "Ops" })),
            StatusCode::OK,
        )
        .await;
    assert_eq!(renamed["name"], "Ops");
}

#[tokio::test]
async fn deleting_a_category_uncategorises_its_tasks() {
    let app = TestApp::new().await;
    let owner = id_of(&app.create_user("filer").await, "userId");
    let category_id = id_of(&app.create_category("Doomed").await, "categoryId");
    let task = app
        .json(
            Method::POST,
            "/api/tasks",
            Some(json!({
                "title": "Filed task",
                "dueDate": "2024-06-01",
                "createdById": owner,
                "categoryId": category_id,
            })),
            StatusCode::CREATED,
        )
        .await;
    let task_id = id_of(&task, "taskId");
    assert_eq!(task["categoryName"], "Doomed");

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/categories/{}", category_id),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let task = app
        .json(Method::GET, &format!("/api/tasks/{}", task_id), None, StatusCode::OK)
        .await;
    assert!(task["categoryId"].is_null());
    assert!(task["categoryName"].is_null());

    let response = app
        .request(
            Method::GET,
            &format!("/api/categories/{}", category_id),
            None,
        )
        .await;
    assert_status(response, StatusCode::NOT_FOUND).await;
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/categories/{}", category_id),
            None,
        )
        .await;
    assert_status(response, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn deleting_a_tag_detaches_it_from_tasks() {
    let app = TestApp::new().await;
    let owner = id_of(&app.create_user("labeler").await, "userId");
    let tag_id = id_of(&app.create_tag("temporary").await, "tagId");
    let task_id = id_of(&app.create_task("Tagged", owner).await, "taskId");
    app.json(
        Method::POST,
        &format!("/api/tasks/{}/tags", task_id),
        Some(json!({ "tagId": tag_id })),
        StatusCode::OK,
    )
    .await;

    let response = app
        .request(Method::POST, "/api/tags", Some(json!({ "name": "temporary" })))
        .await;
    assert_status(response, StatusCode::CONFLICT).await;

    let response = app
        .request(Method::DELETE, &format!("/api/tags/{}", tag_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let task = app
        .json(Method::GET, &format!("/api/tasks/{}", task_id), None, StatusCode::OK)
        .await;
    assert_eq!(task["tags"], json!([]));
    let tags = app.json(Method::GET, "/api/tags", None, StatusCode::OK).await;
    assert_eq!(tags, json!([]));

    let response = app
        .request(Method::DELETE, &format!("/api/tags/{}", tag_id), None)
        .await;
    assert_status(response, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn attachments_are_recorded_listed_and_removed() {
    let app = TestApp::new().await;
    let owner = id_of(&app.create_user("uploader").await, "userId");
    let reviewer = id_of(&app.create_user("reviewer").await, "userId");
    let task_id = id_of(&app.create_task("With files", owner).await, "taskId");
    let uri = format!("/api/tasks/{}/attachments", task_id);

    let attachment = app
        .json(
            Method::POST,
            &uri,
            Some(json!({
                "fileName": "design.pdf",
                "filePath": "/uploads/design.pdf",
                "fileSize": 2048,
                "mimeType": "application/pdf",
                "uploadedById": reviewer,
            })),
            StatusCode::CREATED,
        )
        .await;
    let attachment_id = id_of(&attachment, "attachmentId");
    assert_eq!(attachment["uploadedByUsername"], "reviewer");
    assert_eq!(attachment["fileSize"], 2048);

    for payload in [
        json!({ "fileName": "", "filePath": "/x" }),
        json!({ "fileName": "x", "filePath": "/x", "fileSize": -1 }),
        json!({ "fileName": "x", "filePath": "/x", "uploadedById": 999 }),
    ] {
        let response = app.request(Method::POST, &uri, Some(payload)).await;
        assert_status(response, StatusCode::BAD_REQUEST).await;
    }

    let listed = app.json(Method::GET, &uri, None, StatusCode::OK).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["fileName"], "design.pdf");

    // Removing through another task's path does not find it.
    let other_task = id_of(&app.create_task("Other", owner).await, "taskId");
    let response = app
        .request(
            Method::DELETE,
            &format!("/api/tasks/{}/attachments/{}", other_task, attachment_id),
            None,
        )
        .await;
    assert_status(response, StatusCode::NOT_FOUND).await;

    let response = app
        .request(Method::DELETE, &format!("{}/{}", uri, attachment_id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let listed = app.json(Method::GET, &uri, None, StatusCode::OK).await;
    assert_eq!(listed, json!([]));

    let entries = app.activity(task_id).await;
    let actions: Vec<&str> = entries
        .iter()
        .map(|e| e["actionType"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["CREATED", "FILE_UPLOADED", "FILE_REMOVED"]);
    assert_eq!(entries[1]["newValue"], "design.pdf");
    assert_eq!(entries[1]["username"], "reviewer");
    assert_eq!(entries[2]["oldValue"], "design.pdf");
}

#[tokio::test]
async fn activity_for_missing_task_is_not_found() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/tasks/55/activity", None).await;
    assert_status(response, StatusCode::NOT_FOUND).await;
}
