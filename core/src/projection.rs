//! Derived, read-only views over a list of todos.
//!
//! Everything here is a pure function of its input and cheap enough to
//! recompute on every render, so nothing is cached.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Todo;

/// Which todos a list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Pending,
    Completed,
}

impl Filter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Pending => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Pending => "pending",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter {0:?}")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "pending" => Ok(Filter::Pending),
            "completed" => Ok(Filter::Completed),
            other => Err(UnknownFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Todos matching `filter`, in store order.
pub fn filter_by(todos: &[Todo], filter: Filter) -> Vec<Todo> {
    todos.iter().filter(|t| filter.matches(t)).cloned().collect()
}

pub fn counts(todos: &[Todo]) -> Counts {
    let completed = todos.iter().filter(|t| t.completed).count();
    Counts {
        total: todos.len(),
        pending: todos.len() - completed,
        completed,
    }
}

/// Share of completed todos as a whole percentage; 0 for an empty list.
pub fn progress_percent(todos: &[Todo]) -> u8 {
    let Counts {
        total, completed, ..
    } = counts(todos);
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// The first `limit` pending todos in store order (newest first after a
/// create), for compact "recent tasks" views.
pub fn recent_pending(todos: &[Todo], limit: usize) -> Vec<Todo> {
    todos
        .iter()
        .filter(|t| !t.completed)
        .take(limit)
        .cloned()
        .collect()
}
