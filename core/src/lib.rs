//! Client-side synchronization core for the todo service.
//!
//! # Overview
//! Keeps an authoritative in-memory copy of the todo list consistent with a
//! remote HTTP CRUD API, polls it in the background, and exposes loading,
//! connectivity and error state to whatever renders it.
//!
//! # Design
//! - `TodoClient` is stateless: `build_*` produces plain-data requests and
//!   `parse_*` consumes plain-data responses. A `Transport` does the I/O.
//! - `SyncController` is the single writer of the `TodoStore`. Every store
//!   change is one indivisible replacement, and nothing is written before
//!   the service confirms it.
//! - `projection` holds pure derived views (filtering, counts, progress).
//! - `TodoSession` bundles controller, filter and poller into the surface a
//!   UI binds to.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod poller;
pub mod projection;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::TodoClient;
pub use config::SyncConfig;
pub use controller::SyncController;
pub use error::{ApiError, ConfigError, Operation, SyncError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use poller::Poller;
pub use projection::{Counts, Filter};
pub use session::TodoSession;
pub use store::{Status, StatusPatch, StoreSnapshot, TodoStore};
pub use transport::{ReqwestTransport, Transport};
pub use types::{CreateTodo, Todo, TodoId, UpdateTodo};
pub use validate::{TodoDraft, TodoPatch};
