//! Orchestrates remote calls and applies their results to the store.
//!
//! # Design
//! The controller is the only writer of the store. The store sits inside a
//! `watch` channel and every change is one `send_modify` call, so readers
//! (views, the poller, tests) never observe a half-applied result.
//!
//! Nothing is applied optimistically. Each operation waits for the service
//! to answer and then writes the server's representation, which makes any
//! two applies commute into "last write wins" without corrupting state. A
//! background refresh landing after a foreground mutation therefore just
//! reinstates the server's current truth.
//!
//! `loading` is a plain flag bracketing foreground operations. Two
//! overlapping foreground calls can clear it early; the UI keeps its
//! controls disabled while `loading` is set, which keeps that from
//! happening in practice. Silent refreshes never touch it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::config::SyncConfig;
use crate::error::{ApiError, Operation};
use crate::http::{HttpRequest, HttpResponse};
use crate::projection::Filter;
use crate::store::{StatusPatch, StoreSnapshot, TodoStore};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

/// Cheap to clone; clones share the same store and transport.
#[derive(Clone)]
pub struct SyncController {
    client: TodoClient,
    transport: Arc<dyn Transport>,
    store: Arc<watch::Sender<TodoStore>>,
}

impl SyncController {
    pub fn new(client: TodoClient, transport: Arc<dyn Transport>) -> Self {
        let (store, _) = watch::channel(TodoStore::new());
        Self {
            client,
            transport,
            store: Arc::new(store),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            TodoClient::new(&config.base_url),
            Arc::new(ReqwestTransport::new()),
        )
    }

    /// Read-only handle that is notified after every store change.
    pub fn subscribe(&self) -> watch::Receiver<TodoStore> {
        self.store.subscribe()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.borrow().snapshot()
    }

    /// Fetch the full list and replace the store's contents.
    ///
    /// This is the connectivity probe: it is the only operation that
    /// writes `connected`. `silent` refreshes (the poller) leave `loading`
    /// alone so routine polling never disables the UI.
    pub async fn refresh(&self, silent: bool) {
        self.begin(silent);
        let request = self.client.build_list_todos(Filter::All);
        let result = match self.call(Operation::List, request).await {
            Ok(response) => self.client.parse_list_todos(response),
            Err(e) => Err(e),
        };

        let mut patch = StatusPatch::default();
        if !silent {
            patch = patch.loading(false);
        }
        match result {
            Ok(todos) => {
                debug!(count = todos.len(), silent, "todos refreshed");
                self.apply(|store| {
                    store.replace_all(todos);
                    store.set_status(patch.connected(true).clear_error());
                });
            }
            Err(e) => {
                log_failure(Operation::List, &e);
                let patch = patch.connected(false).error(e.message());
                self.apply(|store| store.set_status(patch));
            }
        }
    }

    /// Create a todo from an already validated payload.
    ///
    /// On success the new todo is placed first. On failure the store and the
    /// global error are left alone; the error is the caller's to display.
    pub async fn create(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        self.begin(false);
        let result = match self.client.build_create_todo(input) {
            Ok(request) => match self.call(Operation::Create, request).await {
                Ok(response) => self.client.parse_create_todo(response),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match &result {
            Ok(todo) => {
                debug!(id = %todo.id, "todo created");
                let todo = todo.clone();
                self.apply(|store| {
                    // A poll may already have delivered it; move it to the top.
                    store.remove(&todo.id);
                    store.upsert(todo);
                    store.set_status(StatusPatch::default().loading(false));
                });
            }
            Err(e) => {
                log_failure(Operation::Create, e);
                self.end();
            }
        }
        result
    }

    /// Set `completed` and store the server's answer. A failure lands in
    /// the global error and leaves the item exactly as it was.
    pub async fn toggle_completion(&self, id: &TodoId, completed: bool) {
        self.begin(false);
        let result = match self.client.build_toggle_todo(id, completed) {
            Ok(request) => match self.call(Operation::Toggle, request).await {
                Ok(response) => self.client.parse_toggle_todo(response),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(todo) => {
                debug!(%id, completed = todo.completed, "todo toggled");
                self.apply(|store| {
                    store.upsert(todo);
                    store.set_status(StatusPatch::default().loading(false));
                });
            }
            Err(e) => self.fail(Operation::Toggle, &e),
        }
    }

    /// Same contract as [`create`](Self::create), targeting an existing id.
    pub async fn update(&self, id: &TodoId, input: &UpdateTodo) -> Result<Todo, ApiError> {
        self.begin(false);
        let result = match self.client.build_update_todo(id, input) {
            Ok(request) => match self.call(Operation::Update, request).await {
                Ok(response) => self.client.parse_update_todo(response),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match &result {
            Ok(todo) => {
                debug!(%id, "todo updated");
                let todo = todo.clone();
                self.apply(|store| {
                    store.upsert(todo);
                    store.set_status(StatusPatch::default().loading(false));
                });
            }
            Err(e) => {
                log_failure(Operation::Update, e);
                self.end();
            }
        }
        result
    }

    /// Remove the id once the service acknowledges the delete.
    pub async fn delete(&self, id: &TodoId) {
        self.begin(false);
        let request = self.client.build_delete_todo(id);
        let result = match self.call(Operation::Delete, request).await {
            Ok(response) => self.client.parse_delete_todo(response),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                debug!(%id, "todo deleted");
                self.apply(|store| {
                    store.remove(id);
                    store.set_status(StatusPatch::default().loading(false));
                });
            }
            Err(e) => self.fail(Operation::Delete, &e),
        }
    }

    /// Re-read a single todo and store the server's copy.
    pub async fn fetch(&self, id: &TodoId) {
        self.begin(false);
        let request = self.client.build_get_todo(id);
        let result = match self.call(Operation::Get, request).await {
            Ok(response) => self.client.parse_get_todo(response),
            Err(e) => Err(e),
        };

        match result {
            Ok(todo) => self.apply(|store| {
                store.upsert(todo);
                store.set_status(StatusPatch::default().loading(false));
            }),
            Err(e) => self.fail(Operation::Get, &e),
        }
    }

    async fn call(&self, op: Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport
            .execute(request)
            .await
            .map_err(|e| ApiError::transport(op, e))
    }

    fn apply(&self, change: impl FnOnce(&mut TodoStore)) {
        self.store.send_modify(change);
    }

    fn begin(&self, silent: bool) {
        let mut patch = StatusPatch::default().clear_error();
        if !silent {
            patch = patch.loading(true);
        }
        self.apply(|store| store.set_status(patch));
    }

    fn end(&self) {
        self.apply(|store| store.set_status(StatusPatch::default().loading(false)));
    }

    /// Failure of an item operation: banner error, `connected` untouched.
    fn fail(&self, op: Operation, error: &ApiError) {
        log_failure(op, error);
        let patch = StatusPatch::default().loading(false).error(error.message());
        self.apply(|store| store.set_status(patch));
    }
}

fn log_failure(op: Operation, error: &ApiError) {
    match error {
        ApiError::Transport { cause, .. } | ApiError::Deserialization { cause, .. } => {
            warn!(?op, %error, cause = %cause, "todo operation failed")
        }
        ApiError::Service { status, .. } => {
            warn!(?op, %error, status, "todo operation failed")
        }
        ApiError::Serialization(_) => warn!(?op, %error, "todo operation failed"),
    }
}
