use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with_key, Listing, Task, TaskList};
use tower::ServiceExt;

const CREDS: &str = "key=KEY&access_token=tok";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn create_list(app: &Router, title: &str) -> TaskList {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/users/@me/lists/?{CREDS}"),
            &format!(r#"{{"title":"{title}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- lists ---

#[tokio::test]
async fn list_lists_empty() {
    let resp = app()
        .oneshot(get_request(&format!("/users/@me/lists/?{CREDS}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let lists: Listing<TaskList> = body_json(resp).await;
    assert_eq!(lists.kind, "tasks#taskLists");
    assert!(lists.items.is_empty());
}

#[tokio::test]
async fn create_list_then_list_it() {
    let app = app();
    let created = create_list(&app, "Groceries").await;
    assert_eq!(created.title, "Groceries");

    let resp = app
        .oneshot(get_request(&format!("/users/@me/lists/?{CREDS}")))
        .await
        .unwrap();
    let lists: Listing<TaskList> = body_json(resp).await;
    assert_eq!(lists.items.len(), 1);
    assert_eq!(lists.items[0].id, created.id);
}

#[tokio::test]
async fn create_list_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("/users/@me/lists/?{CREDS}"),
            r#"{"name":1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- credentials ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(get_request("/users/@me/lists/?key=KEY"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"]["code"], 401);
}

#[tokio::test]
async fn wrong_key_returns_400() {
    let resp = app_with_key(Some("KEY"))
        .oneshot(get_request("/users/@me/lists/?key=nope&access_token=tok"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn matching_key_is_accepted() {
    let resp = app_with_key(Some("KEY"))
        .oneshot(get_request(&format!("/users/@me/lists/?{CREDS}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- tasks ---

#[tokio::test]
async fn list_tasks_unknown_list_returns_404() {
    let resp = app()
        .oneshot(get_request(&format!("/lists/missing/tasks/?{CREDS}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_task_and_patch_it() {
    let app = app();
    let list = create_list(&app, "Home").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/lists/{}/tasks/?{CREDS}", list.id),
            r#"{"title":"Sweep","notes":"kitchen"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let task: Task = body_json(resp).await;
    assert_eq!(task.status, "needsAction");
    assert_eq!(task.notes.as_deref(), Some("kitchen"));

    let resp = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/lists/{}/tasks/{}/?{CREDS}", list.id, task.id),
            r#"{"status":"completed"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Task = body_json(resp).await;
    assert_eq!(patched.status, "completed");
    assert_eq!(patched.title, "Sweep");
    assert_eq!(patched.notes.as_deref(), Some("kitchen"));

    let resp = app
        .oneshot(get_request(&format!("/lists/{}/tasks/?{CREDS}", list.id)))
        .await
        .unwrap();
    let tasks: Listing<Task> = body_json(resp).await;
    assert_eq!(tasks.items.len(), 1);
    assert_eq!(tasks.items[0].status, "completed");
}

#[tokio::test]
async fn patch_unknown_task_returns_404() {
    let app = app();
    let list = create_list(&app, "Home").await;
    let resp = app
        .oneshot(json_request(
            "PATCH",
            &format!("/lists/{}/tasks/nope/?{CREDS}", list.id),
            r#"{"title":"x"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_method_returns_405() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/users/@me/lists/?{CREDS}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(body_bytes(resp).await.is_empty());
}
