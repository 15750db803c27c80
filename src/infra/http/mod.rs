//! Axum HTTP layer: state, router and request plumbing.

pub mod flash;
mod middleware;
mod posts;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::error::ErrorReport;
use crate::application::posts::PostService;
use crate::application::repos::{AuthorsRepo, HealthRepo};

use middleware::{log_responses, resolve_viewer, set_request_context};

/// Request header naming the acting author. The identity collaborator in
/// front of foglio is expected to set it; absent or unknown ids degrade to
/// an anonymous viewer.
pub const VIEWER_HEADER: &str = "x-author";

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub authors: Arc<dyn AuthorsRepo>,
    pub health: Arc<dyn HealthRepo>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(posts::list))
        .route("/posts/new", get(posts::new_form).post(posts::create))
        .route("/posts/{slug}", get(posts::detail))
        .route("/posts/{slug}/edit", get(posts::edit_form).post(posts::update))
        .route("/posts/{slug}/delete", post(posts::delete))
        .route("/health/db", get(db_health))
        .layer(from_fn_with_state(state.clone(), resolve_viewer))
        .layer(from_fn(log_responses))
        .layer(from_fn(set_request_context))
        .with_state(state)
}

async fn db_health(State(state): State<HttpState>) -> Response {
    match state.health.ping().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
