//! In-memory authoritative copy of the todo list plus live status flags.
//!
//! # Design
//! Every mutation replaces whole values: a todo is either inserted, fully
//! overwritten with the server's representation, or removed. Nothing is
//! merged field by field, so the store can never hold a mix of two server
//! versions of the same item. None of the operations can fail, and the
//! store knows nothing about the network.
//!
//! Ordering is meaningful only for display. Callers must locate items by
//! id, because a refresh replaces the order with whatever the service
//! returns.

use crate::types::{Todo, TodoId};

/// Process-wide status shown by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// A foreground operation is in flight.
    pub loading: bool,
    /// Outcome of the most recent list refresh.
    pub connected: bool,
    pub last_error: Option<String>,
}

/// Partial status update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPatch {
    pub loading: Option<bool>,
    pub connected: Option<bool>,
    pub last_error: Option<Option<String>>,
}

impl StatusPatch {
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn connected(mut self, connected: bool) -> Self {
        self.connected = Some(connected);
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.last_error = Some(Some(message.into()));
        self
    }

    pub fn clear_error(mut self) -> Self {
        self.last_error = Some(None);
        self
    }
}

/// Owned copy of the store at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub todos: Vec<Todo>,
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoStore {
    todos: Vec<Todo>,
    status: Status,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| &t.id == id)
    }

    /// Replace the whole list, keeping the service's order. Duplicate ids
    /// keep their first occurrence.
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        let mut unique: Vec<Todo> = Vec::with_capacity(todos.len());
        for todo in todos {
            if !unique.iter().any(|t| t.id == todo.id) {
                unique.push(todo);
            }
        }
        self.todos = unique;
    }

    /// Overwrite the item with the same id in place, or prepend it when the
    /// id is new.
    pub fn upsert(&mut self, todo: Todo) {
        match self.todos.iter_mut().find(|t| t.id == todo.id) {
            Some(existing) => *existing = todo,
            None => self.todos.insert(0, todo),
        }
    }

    /// Returns whether the id was present.
    pub fn remove(&mut self, id: &TodoId) -> bool {
        let before = self.todos.len();
        self.todos.retain(|t| &t.id != id);
        self.todos.len() != before
    }

    pub fn set_status(&mut self, patch: StatusPatch) {
        if let Some(loading) = patch.loading {
            self.status.loading = loading;
        }
        if let Some(connected) = patch.connected {
            self.status.connected = connected;
        }
        if let Some(last_error) = patch.last_error {
            self.status.last_error = last_error;
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            todos: self.todos.clone(),
            status: self.status.clone(),
        }
    }
}
