use thiserror::Error;
use time::OffsetDateTime;

use crate::application::repos::RepoError;

#[derive(Debug, Error)]
pub enum PostServiceError {
    /// Missing resource, hidden draft, or an unauthorized mutation attempt.
    /// One variant on purpose: callers must not be able to tell "exists but
    /// forbidden" apart from "does not exist".
    #[error("post not found")]
    NotFound,
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("unique constraint `{constraint}` violated")]
    Conflict { constraint: String },
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for PostServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => PostServiceError::NotFound,
            RepoError::Duplicate { constraint } => PostServiceError::Conflict { constraint },
            other => PostServiceError::Repo(other),
        }
    }
}

impl From<FieldErrors> for PostServiceError {
    fn from(errors: FieldErrors) -> Self {
        PostServiceError::Validation(errors)
    }
}

/// Parsed authoring-form content, not yet validated.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub draft: bool,
    /// `None` means "keep the default": creation time on create, the stored
    /// value on update.
    pub publish: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Accumulated per-field validation failures, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<FieldError>,
}

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: &'static str) {
        self.entries.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }
}

pub(crate) fn validate(input: &PostInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if input.title.trim().is_empty() {
        errors.push("title", "Title is required.");
    }
    if input.content.trim().is_empty() {
        errors.push("content", "Content is required.");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
