//! Listing, detail and authoring handlers for posts.

mod forms;
mod handlers;

pub(crate) use handlers::{create, delete, detail, edit_form, list, new_form, update};
