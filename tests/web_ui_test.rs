mod common;

use axum::http::{header::LOCATION, Method, StatusCode};

use common::{body_json, body_text, id_of, TestApp};

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn board_pages_render_stored_data() {
    let app = TestApp::new().await;
    let owner = id_of(&app.create_user("pagewriter").await, "userId");
    app.create_task("Fix <script> injection", owner).await;

    for uri in ["/", "/tasks", "/users"] {
        let response = app.request(Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        let html = body_text(response).await;
        assert!(html.contains("<html"), "{} is not a page", uri);
    }

    let html = body_text(app.request(Method::GET, "/tasks", None).await).await;
    assert!(html.contains("Fix &lt;script&gt; injection"));
    assert!(!html.contains("<script> injection"));

    let html = body_text(app.request(Method::GET, "/users", None).await).await;
    assert!(html.contains("pagewriter"));
    assert!(html.contains("pagewriter@example.com"));
}

#[tokio::test]
async fn placeholder_like_titles_render_literally() {
    let app = TestApp::new().await;
    let owner = id_of(&app.create_user("braces").await, "userId");
    app.create_task("{{team}}", owner).await;
    app.create_task("{{user_options}}", owner).await;

    let html = body_text(app.request(Method::GET, "/", None).await).await;
    assert_eq!(html.matches(r#"class="avatar""#).count(), 1);
    assert!(html.contains("<td>{{team}}</td>"));

    let html = body_text(app.request(Method::GET, "/tasks", None).await).await;
    assert!(html.contains("{{team}}"));
    assert!(html.contains("{{user_options}}"));
}

#[tokio::test]
async fn forms_create_records_and_redirect() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/users/create",
            "username=formuser&email=formuser%40example.com&password=s3cret-pass&full_name=Form+User&role=",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/users");

    let users = app
        .json(Method::GET, "/api/users", None, StatusCode::OK)
        .await;
    let user_id = id_of(&users[0], "userId");
    assert_eq!(users[0]["role"], "MEMBER");

    let form = format!(
        "title=From+the+board&description=&status=IN_PROGRESS&priority=HIGH&start_date=&due_date=2024-07-01&category_id=&created_by_id={}",
        user_id
    );
    let response = app.post_form("/tasks/create", &form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tasks");

    let tasks = app.json(Method::GET, "/api/tasks", None, StatusCode::OK).await;
    assert_eq!(tasks[0]["title"], "From the board");
    assert_eq!(tasks[0]["status"], "IN_PROGRESS");
    assert_eq!(tasks[0]["priority"], "HIGH");
    assert_eq!(tasks[0]["dueDate"], "2024-07-01");
}

#[tokio::test]
async fn rejected_forms_redirect_with_an_error_message() {
    let app = TestApp::new().await;

    let response = app
        .post_form("/tasks/create", "title=No+due+date&due_date=&created_by_id=1")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("/tasks?error="), "{}", target);

    let response = app
        .post_form("/users/create", "username=&email=bad&password=x")
        .await;
    assert!(location(&response).starts_with("/users?error="));

    let response = app.request(Method::GET, &target, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"class="error""#));

    let tasks = app.json(Method::GET, "/api/tasks", None, StatusCode::OK).await;
    assert_eq!(tasks.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn inline_forms_change_status_priority_and_trash() {
    let app = TestApp::new().await;
    let owner = id_of(&app.create_user("inline").await, "userId");
    let task_id = id_of(&app.create_task("Inline edits", owner).await, "taskId");

    let response = app
        .post_form(&format!("/tasks/update-status/{}", task_id), "status=DONE")
        .await;
    assert_eq!(location(&response), "/tasks");
    let response = app
        .post_form(&format!("/tasks/update-priority/{}", task_id), "priority=URGENT")
        .await;
    assert_eq!(location(&response), "/tasks");

    let task = app
        .json(Method::GET, &format!("/api/tasks/{}", task_id), None, StatusCode::OK)
        .await;
    assert_eq!(task["status"], "DONE");
    assert_eq!(task["priority"], "URGENT");

    let response = app
        .post_form(&format!("/tasks/update-status/{}", task_id), "status=SHIPPED")
        .await;
    assert!(location(&response).starts_with("/tasks?error="));

    let response = app
        .post_form(&format!("/tasks/delete/{}", task_id), "")
        .await;
    assert_eq!(location(&response), "/tasks");
    let trash = app.json(Method::GET, "/api/trash", None, StatusCode::OK).await;
    assert_eq!(id_of(&trash[0], "taskId"), task_id);

    let response = app.post_form("/tasks/delete/404", "").await;
    assert!(location(&response).starts_with("/tasks?error="));
}

#[tokio::test]
async fn health_and_api_docs_are_served() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let health = body_json(response).await;
    assert_eq!(health["database"], "up");

    let response = app.request(Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/api/tasks"].is_object());
}
