use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskList {
    pub kind: String,
    pub id: String,
    pub title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub kind: String,
    pub id: String,
    pub title: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Listing<T> {
    pub kind: String,
    pub items: Vec<T>,
}

#[derive(Deserialize)]
pub struct CreateList {
    pub title: String,
}

#[derive(Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub notes: Option<String>,
    pub due: Option<String>,
}

#[derive(Deserialize)]
pub struct PatchTask {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub due: Option<String>,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub key: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Default)]
pub struct Store {
    lists: Vec<TaskList>,
    tasks: HashMap<String, Vec<Task>>,
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Store>>,
    api_key: Option<String>,
}

/// Router that accepts any `key`.
pub fn app() -> Router {
    app_with_key(None)
}

/// Router that rejects requests whose `key` differs from `api_key`.
pub fn app_with_key(api_key: Option<&str>) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        api_key: api_key.map(str::to_string),
    };
    Router::new()
        .route("/users/@me/lists/", get(list_lists).post(create_list))
        .route("/lists/{list_id}/tasks/", get(list_tasks).post(create_task))
        .route("/lists/{list_id}/tasks/{task_id}/", patch(update_task))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: Option<&str>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_key(api_key)).await
}

fn failure(status: StatusCode, message: &str) -> Response {
    let body = json!({ "error": { "code": status.as_u16(), "message": message } });
    (status, Json(body)).into_response()
}

fn authorize(state: &AppState, creds: &Credentials) -> Result<(), Response> {
    if let Some(expected) = &state.api_key {
        if creds.key.as_deref() != Some(expected.as_str()) {
            return Err(failure(StatusCode::BAD_REQUEST, "API key not valid"));
        }
    }
    match creds.access_token.as_deref() {
        Some(token) if !token.is_empty() => Ok(()),
        _ => Err(failure(StatusCode::UNAUTHORIZED, "Invalid Credentials")),
    }
}

async fn list_lists(
    State(state): State<AppState>,
    Query(creds): Query<Credentials>,
) -> Result<Json<Listing<TaskList>>, Response> {
    authorize(&state, &creds)?;
    let store = state.db.read().await;
    Ok(Json(Listing {
        kind: "tasks#taskLists".to_string(),
        items: store.lists.clone(),
    }))
}

async fn create_list(
    State(state): State<AppState>,
    Query(creds): Query<Credentials>,
    Json(input): Json<CreateList>,
) -> Result<Json<TaskList>, Response> {
    authorize(&state, &creds)?;
    let list = TaskList {
        kind: "tasks#taskList".to_string(),
        id: Uuid::new_v4().to_string(),
        title: input.title,
    };
    let mut store = state.db.write().await;
    store.tasks.insert(list.id.clone(), Vec::new());
    store.lists.push(list.clone());
    debug!(list_id = %list.id, "created list");
    Ok(Json(list))
}

async fn list_tasks(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Query(creds): Query<Credentials>,
) -> Result<Json<Listing<Task>>, Response> {
    authorize(&state, &creds)?;
    let store = state.db.read().await;
    let tasks = store
        .tasks
        .get(&list_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Not Found"))?;
    Ok(Json(Listing {
        kind: "tasks#tasks".to_string(),
        items: tasks.clone(),
    }))
}

async fn create_task(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    Query(creds): Query<Credentials>,
    Json(input): Json<CreateTask>,
) -> Result<Json<Task>, Response> {
    authorize(&state, &creds)?;
    let mut store = state.db.write().await;
    let tasks = store
        .tasks
        .get_mut(&list_id)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Not Found"))?;
    let task = Task {
        kind: "tasks#task".to_string(),
        id: Uuid::new_v4().to_string(),
        title: input.title,
        status: "needsAction".to_string(),
        notes: input.notes,
        due: input.due,
    };
    tasks.push(task.clone());
    debug!(%list_id, task_id = %task.id, "created task");
    Ok(Json(task))
}

async fn update_task(
    State(state): State<AppState>,
    Path((list_id, task_id)): Path<(String, String)>,
    Query(creds): Query<Credentials>,
    Json(input): Json<PatchTask>,
) -> Result<Json<Task>, Response> {
    authorize(&state, &creds)?;
    let mut store = state.db.write().await;
    let task = store
        .tasks
        .get_mut(&list_id)
        .and_then(|tasks| tasks.iter_mut().find(|t| t.id == task_id))
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Not Found"))?;
    if let Some(title) = input.title {
        task.title = title;
    }
    if let Some(notes) = input.notes {
        task.notes = Some(notes);
    }
    if let Some(status) = input.status {
        task.status = status;
    }
    if let Some(due) = input.due {
        task.due = Some(due);
    }
    Ok(Json(task.clone()))
}
