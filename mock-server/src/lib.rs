use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

const TITLE_MAX_CHARS: usize = 255;
const DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// Newest first.
pub type Db = Arc<RwLock<Vec<Todo>>>;

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    let todos = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(db);
    Router::new().nest("/api", todos)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn ok(status: StatusCode, data: Value) -> ApiResult {
    Ok((status, Json(data)))
}

fn fail(status: StatusCode, message: &str) -> ApiResult {
    Err((status, Json(json!({ "success": false, "message": message }))))
}

fn not_found() -> ApiResult {
    fail(StatusCode::NOT_FOUND, "Todo not found")
}

fn clean_title(raw: &str) -> Result<String, &'static str> {
    let title = raw.trim();
    if title.is_empty() {
        return Err("Title is required");
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err("Title must be less than 255 characters");
    }
    Ok(title.to_string())
}

fn clean_description(raw: Option<String>) -> Result<Option<String>, &'static str> {
    let Some(description) = raw.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err("Description must be less than 1000 characters");
    }
    Ok(Some(description))
}

async fn list_todos(State(db): State<Db>, Query(query): Query<ListQuery>) -> ApiResult {
    let todos = db.read().await;
    let filtered: Vec<&Todo> = match query.status.as_deref() {
        None | Some("") | Some("all") => todos.iter().collect(),
        Some("pending") => todos.iter().filter(|t| !t.completed).collect(),
        Some("completed") => todos.iter().filter(|t| t.completed).collect(),
        Some(_) => return fail(StatusCode::BAD_REQUEST, "Invalid status filter"),
    };
    debug!(count = filtered.len(), "list todos");
    ok(
        StatusCode::OK,
        json!({ "success": true, "count": filtered.len(), "data": filtered }),
    )
}

async fn create_todo(State(db): State<Db>, Json(input): Json<CreateTodo>) -> ApiResult {
    let title = match clean_title(&input.title) {
        Ok(title) => title,
        Err(message) => return fail(StatusCode::BAD_REQUEST, message),
    };
    let description = match clean_description(input.description) {
        Ok(description) => description,
        Err(message) => return fail(StatusCode::BAD_REQUEST, message),
    };
    let now = Utc::now();
    let todo = Todo {
        id: Uuid::new_v4(),
        title,
        description,
        completed: false,
        created_at: now,
        updated_at: now,
    };
    db.write().await.insert(0, todo.clone());
    debug!(id = %todo.id, "created todo");
    ok(StatusCode::CREATED, json!({ "success": true, "data": todo }))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult {
    let todos = db.read().await;
    match todos.iter().find(|t| t.id == id) {
        Some(todo) => ok(StatusCode::OK, json!({ "success": true, "data": todo })),
        None => not_found(),
    }
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodo>,
) -> ApiResult {
    let title = match input.title.as_deref().map(clean_title).transpose() {
        Ok(title) => title,
        Err(message) => return fail(StatusCode::BAD_REQUEST, message),
    };
    let description = match clean_description(input.description) {
        Ok(description) => description,
        Err(message) => return fail(StatusCode::BAD_REQUEST, message),
    };

    let mut todos = db.write().await;
    let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
        return not_found();
    };
    if let Some(title) = title {
        todo.title = title;
    }
    if let Some(description) = description {
        todo.description = Some(description);
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    todo.updated_at = Utc::now().max(todo.created_at);
    ok(StatusCode::OK, json!({ "success": true, "data": todo }))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult {
    let mut todos = db.write().await;
    let before = todos.len();
    todos.retain(|t| t.id != id);
    if todos.len() == before {
        return not_found();
    }
    ok(
        StatusCode::OK,
        json!({ "success": true, "message": "Todo deleted successfully" }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_to_json() {
        let at = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let todo = Todo {
            id: Uuid::nil(),
            title: "Test".to_string(),
            description: None,
            completed: false,
            created_at: at,
            updated_at: at,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["title"], "Test");
        assert_eq!(json["description"], Value::Null);
        assert_eq!(json["completed"], false);
        assert_eq!(json["created_at"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn create_todo_description_is_optional() {
        let input: CreateTodo = serde_json::from_str(r#"{"title":"No description"}"#).unwrap();
        assert_eq!(input.title, "No description");
        assert!(input.description.is_none());
    }

    #[test]
    fn create_todo_rejects_missing_title() {
        let result: Result<CreateTodo, _> = serde_json::from_str(r#"{"description":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_todo_all_fields_optional() {
        let input: UpdateTodo = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.title.is_none());
        assert!(input.description.is_none());
        assert!(input.completed.is_none());
    }

    #[test]
    fn title_is_trimmed_and_bounded() {
        assert_eq!(clean_title("  Walk dog "), Ok("Walk dog".to_string()));
        assert_eq!(clean_title("   "), Err("Title is required"));
        assert!(clean_title(&"a".repeat(256)).is_err());
    }

    #[test]
    fn blank_description_becomes_none() {
        assert_eq!(clean_description(Some("  ".to_string())), Ok(None));
        assert_eq!(clean_description(None), Ok(None));
        assert!(clean_description(Some("d".repeat(1001))).is_err());
    }
}
