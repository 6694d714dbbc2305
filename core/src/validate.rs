//! Input-boundary validation for form drafts.
//!
//! Drafts are checked and normalized here, before a request is built.
//! Lengths are counted in code points on the trimmed text.

use crate::error::ValidationError;
use crate::types::{CreateTodo, UpdateTodo};

pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Raw contents of the "add todo" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<CreateTodo, ValidationError> {
        Ok(CreateTodo {
            title: title(&self.title)?,
            description: description(self.description.as_deref())?,
        })
    }
}

/// Raw contents of the inline edit form; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// A blank description is dropped from the request rather than sent as
    /// an empty string.
    pub fn validate(&self) -> Result<UpdateTodo, ValidationError> {
        Ok(UpdateTodo {
            title: self.title.as_deref().map(title).transpose()?,
            description: description(self.description.as_deref())?,
            completed: self.completed,
        })
    }
}

fn title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(trimmed.to_string())
}

fn description(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(trimmed) = raw.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(Some(trimmed.to_string()))
}
