use std::sync::Arc;

use crate::application::pagination::Paginator;
use crate::application::repos::{PostsRepo, PostsWriteRepo};

#[derive(Clone)]
pub struct PostService {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) paginator: Paginator,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        paginator: Paginator,
    ) -> Self {
        Self {
            reader,
            writer,
            paginator,
        }
    }
}
