//! Shared fixtures for controller-level tests.
//!
//! `ScriptedTransport` replays queued responses in order and records every
//! request it sees. When attached to a store receiver it also samples the
//! `loading` flag at the moment each request goes out.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::watch;
use todo_sync::{
    HttpRequest, HttpResponse, SyncController, TodoClient, TodoStore, Transport, TransportError,
};

pub const BASE_URL: &str = "http://localhost:5000/api";
pub const T1: &str = "2024-05-01T10:00:00Z";
pub const T2: &str = "2024-05-01T11:00:00Z";
pub const T3: &str = "2024-05-01T12:30:00Z";

#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    fallback: Mutex<Option<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    observer: Mutex<Option<watch::Receiver<TodoStore>>>,
    loading_seen: Mutex<Vec<bool>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer every unscripted request with `response`.
    pub fn repeating(response: HttpResponse) -> Arc<Self> {
        let transport = Self::default();
        *transport.fallback.lock().unwrap() = Some(response);
        Arc::new(transport)
    }

    pub fn push(&self, response: HttpResponse) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_unreachable(&self) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(TransportError("connection refused".to_string())));
    }

    pub fn observe(&self, receiver: watch::Receiver<TodoStore>) {
        *self.observer.lock().unwrap() = Some(receiver);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn loading_seen(&self) -> Vec<bool> {
        self.loading_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Some(rx) = self.observer.lock().unwrap().as_ref() {
            let loading = rx.borrow().status().loading;
            self.loading_seen.lock().unwrap().push(loading);
        }
        self.requests.lock().unwrap().push(request);

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        self.fallback
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TransportError("no scripted response".to_string()))
    }
}

pub fn controller(transport: &Arc<ScriptedTransport>) -> SyncController {
    let controller = SyncController::new(TodoClient::new(BASE_URL), transport.clone());
    transport.observe(controller.subscribe());
    controller
}

pub fn todo_json(id: i64, title: &str, completed: bool, created: &str, updated: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "completed": completed,
        "created_at": created,
        "updated_at": updated,
    })
}

pub fn respond(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: Vec::new(),
        body: body.to_string(),
    }
}

pub fn data(status: u16, payload: Value) -> HttpResponse {
    respond(status, json!({ "success": true, "data": payload }))
}
