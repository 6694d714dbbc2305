//! Error types for the todo sync core.
//!
//! # Design
//! Remote failures are normalized to a single user-facing message per
//! operation. `ApiError` keeps the low-level cause next to that message so
//! it can be logged, but `Display` only ever shows the message the UI
//! should render. Validation failures live in their own type because they
//! are raised before any request exists and never touch shared status.

use thiserror::Error;

/// The remote operation a request belongs to. Determines the fallback
/// message used when the service does not provide one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Toggle,
    Delete,
}

impl Operation {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::List => "Failed to fetch todos",
            Operation::Get => "Failed to fetch todo",
            Operation::Create => "Failed to create todo",
            Operation::Update => "Failed to update todo",
            Operation::Toggle => "Failed to toggle todo",
            Operation::Delete => "Failed to delete todo",
        }
    }
}

/// Errors produced by a remote round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, ...).
    #[error("{message}")]
    Transport { message: String, cause: String },

    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Service { status: u16, message: String },

    /// A 2xx response whose body is not the expected envelope.
    #[error("{message}")]
    Deserialization { message: String, cause: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    pub fn transport(op: Operation, cause: impl ToString) -> Self {
        ApiError::Transport {
            message: op.fallback_message().to_string(),
            cause: cause.to_string(),
        }
    }

    /// The text shown in the error banner or next to a form.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// `true` when no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

/// Failure of the transport itself, before any response exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// Client-side input rejections. Raised before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Title must be less than 255 characters")]
    TitleTooLong,

    #[error("Description must be less than 1000 characters")]
    DescriptionTooLong,
}

impl ValidationError {
    /// The form field the error belongs to.
    pub fn field(self) -> &'static str {
        match self {
            ValidationError::TitleRequired | ValidationError::TitleTooLong => "title",
            ValidationError::DescriptionTooLong => "description",
        }
    }
}

/// Result error of the form-backed operations (`create`, `update`), which
/// report failures to the caller instead of the global banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Invalid environment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
