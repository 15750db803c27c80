use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;
use crate::domain::viewer::Viewer;

use super::{HttpState, VIEWER_HEADER};

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let ctx = RequestContext {
        request_id: request_id.clone(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Resolve the acting viewer once per request from the identity header.
///
/// Lookup failures degrade to anonymous rather than erroring the request:
/// fail-closed, since anonymous viewers hold no privileges.
pub async fn resolve_viewer(
    State(state): State<HttpState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let author_id = request
        .headers()
        .get(VIEWER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok());

    let viewer = match author_id {
        Some(id) => match state.authors.find_author(id).await {
            Ok(Some(author)) => Viewer::Known(author),
            Ok(None) => Viewer::Anonymous,
            Err(err) => {
                warn!(target: "foglio::http", error = %err, "viewer lookup failed");
                Viewer::Anonymous
            }
        },
        None => Viewer::Anonymous,
    };

    request.extensions_mut().insert(viewer);
    next.run(request).await
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        let elapsed_ms = start.elapsed().as_millis();
        let report = response.extensions_mut().remove::<ErrorReport>();
        let (source, messages) = match report {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };

        if status.is_server_error() {
            error!(
                target: "foglio::http",
                %method,
                %uri,
                status = status.as_u16(),
                elapsed_ms,
                request_id,
                source,
                messages = ?messages,
                "request failed"
            );
        } else {
            warn!(
                target: "foglio::http",
                %method,
                %uri,
                status = status.as_u16(),
                elapsed_ms,
                request_id,
                source,
                "request rejected"
            );
        }
    }

    response
}
