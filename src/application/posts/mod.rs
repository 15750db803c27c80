//! The post query engine and mutation gate.

mod commands;
mod queries;
mod service;
mod types;

pub use queries::PostListing;
pub use service::PostService;
pub use types::{FieldError, FieldErrors, PostInput, PostServiceError};
