//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each remote operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! A `Transport` executes the round-trip in between.
//!
//! Status codes are only ever classified as success (2xx) or failure. A
//! failure's message comes from the body's `message` field when present and
//! falls back to a fixed per-operation text otherwise.

use serde::de::DeserializeOwned;

use crate::error::{ApiError, Operation};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::projection::Filter;
use crate::types::{CreateTodo, DataEnvelope, ErrorBody, Todo, TodoId, UpdateTodo};

/// Synchronous, stateless client for the todo API.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `Filter::All` sends no query string.
    pub fn build_list_todos(&self, filter: Filter) -> HttpRequest {
        let path = match filter {
            Filter::All => format!("{}/todos", self.base_url),
            other => format!("{}/todos?status={other}", self.base_url),
        };
        request(HttpMethod::Get, path, None)
    }

    pub fn build_get_todo(&self, id: &TodoId) -> HttpRequest {
        request(HttpMethod::Get, self.item_path(id), None)
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(request(HttpMethod::Post, format!("{}/todos", self.base_url), Some(body)))
    }

    pub fn build_update_todo(&self, id: &TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(request(HttpMethod::Put, self.item_path(id), Some(body)))
    }

    /// Single-field update carrying only `completed`.
    pub fn build_toggle_todo(&self, id: &TodoId, completed: bool) -> Result<HttpRequest, ApiError> {
        let input = UpdateTodo {
            completed: Some(completed),
            ..UpdateTodo::default()
        };
        self.build_update_todo(id, &input)
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        request(HttpMethod::Delete, self.item_path(id), None)
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        parse_data(Operation::List, response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(Operation::Get, response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(Operation::Create, response)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(Operation::Update, response)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        parse_data(Operation::Toggle, response)
    }

    /// The acknowledgement body is not inspected.
    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(Operation::Delete, &response)
    }

    fn item_path(&self, id: &TodoId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

fn request(method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
    let headers = match body {
        Some(_) => vec![("content-type".to_string(), "application/json".to_string())],
        None => Vec::new(),
    };
    HttpRequest {
        method,
        path,
        headers,
        body,
    }
}

fn parse_data<T: DeserializeOwned>(op: Operation, response: HttpResponse) -> Result<T, ApiError> {
    check_status(op, &response)?;
    serde_json::from_str::<DataEnvelope<T>>(&response.body)
        .map(|envelope| envelope.data)
        .map_err(|e| ApiError::Deserialization {
            message: op.fallback_message().to_string(),
            cause: e.to_string(),
        })
}

/// Map a non-2xx response to `ApiError::Service` with the best message
/// available.
fn check_status(op: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| op.fallback_message().to_string());
    Err(ApiError::Service {
        status: response.status,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:5000/api")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    const TODO_JSON: &str = r#"{"id":1,"title":"Test","completed":false,
        "created_at":"2024-05-01T10:00:00Z","updated_at":"2024-05-01T10:00:00Z"}"#;

    #[test]
    fn build_list_todos_produces_correct_request() {
        let req = client().build_list_todos(Filter::All);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:5000/api/todos");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_todos_with_status_filter() {
        let req = client().build_list_todos(Filter::Completed);
        assert_eq!(req.path, "http://localhost:5000/api/todos?status=completed");
    }

    #[test]
    fn build_get_todo_uses_opaque_id() {
        let req = client().build_get_todo(&TodoId::from("abc-1"));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:5000/api/todos/abc-1");
    }

    #[test]
    fn build_create_todo_omits_missing_description() {
        let input = CreateTodo {
            title: "Buy milk".to_string(),
            description: None,
        };
        let req = client().build_create_todo(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Buy milk"}));
    }

    #[test]
    fn build_toggle_sends_only_completed() {
        let req = client().build_toggle_todo(&TodoId::Int(4), true).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:5000/api/todos/4");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"completed": true}));
    }

    #[test]
    fn build_delete_todo_produces_correct_request() {
        let req = client().build_delete_todo(&TodoId::Int(2));
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_unwraps_data_envelope() {
        let body = format!(r#"{{"data":{TODO_JSON}}}"#);
        let todo = client().parse_create_todo(response(201, &body)).unwrap();
        assert_eq!(todo.id, TodoId::Int(1));
        assert_eq!(todo.title, "Test");
    }

    #[test]
    fn parse_list_accepts_any_2xx() {
        let body = format!(r#"{{"data":[{TODO_JSON}],"count":1}}"#);
        let todos = client().parse_list_todos(response(203, &body)).unwrap();
        assert_eq!(todos.len(), 1);
    }

    #[test]
    fn service_message_is_preferred() {
        let err = client()
            .parse_update_todo(response(400, r#"{"message":"Title is required"}"#))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Service {
                status: 400,
                message: "Title is required".to_string()
            }
        );
    }

    #[test]
    fn missing_message_falls_back_per_operation() {
        let err = client().parse_delete_todo(response(500, "internal error")).unwrap_err();
        assert_eq!(err.message(), "Failed to delete todo");
        let err = client().parse_toggle_todo(response(502, "{}")).unwrap_err();
        assert_eq!(err.message(), "Failed to toggle todo");
    }

    #[test]
    fn delete_ignores_ack_body() {
        assert!(client().parse_delete_todo(response(200, "whatever")).is_ok());
        assert!(client().parse_delete_todo(response(204, "")).is_ok());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:5000/api/");
        let req = client.build_list_todos(Filter::All);
        assert_eq!(req.path, "http://localhost:5000/api/todos");
    }

    #[test]
    fn parse_list_todos_bad_json() {
        let err = client().parse_list_todos(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization { .. }));
        assert_eq!(err.message(), "Failed to fetch todos");
    }
}
