use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::{
    app_state::AppState,
    request::{method::Method, Request},
    response::{Response, BAD_REQUEST, NOT_FOUND},
};

use self::{
    like::handle_like,
    root::handle_root,
    thoughts::{handle_create, handle_list},
};

mod like;
mod root;
mod thoughts;

pub use root::{Endpoint, Welcome};
pub use thoughts::RECENT_LIMIT;

/// Every route the router dispatches, in registration order.
pub const ROUTES: &[(Method, &str)] = &[
    (Method::Get, "/"),
    (Method::Get, "/thoughts"),
    (Method::Post, "/thoughts"),
    (Method::Post, "/thoughts/:id/like"),
];

/// Reads one request from `stream`, answers it, and returns once the response is written.
pub async fn handle_connection<S>(mut stream: S, state: Arc<AppState>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut response = match Request::from_stream(&mut stream).await {
        Ok(request) => {
            let response = route(&request, &state).await;
            debug!(
                method = %request.method(),
                path = request.path(),
                status = response.get_status_line(),
                "handled request"
            );
            response
        }
        Err(e) if e.is_malformed() => {
            warn!(error = %e, "malformed request");
            Response::error(BAD_REQUEST, "Malformed request")
        }
        Err(e) => {
            debug!(error = %e, "failed to read from stream");
            return;
        }
    };

    state.cors.apply(&mut response);

    if let Err(e) = stream.write_all(response.to_string().as_bytes()).await {
        warn!(error = %e, "failed to send response");
        return;
    }
    if let Err(e) = stream.shutdown().await {
        debug!(error = %e, "failed to shut down stream");
    }
}

/// Dispatches a parsed request to its handler. CORS headers are added by the caller.
pub async fn route(request: &Request, state: &AppState) -> Response {
    let segments: Vec<&str> = request
        .path()
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match (request.method(), segments.as_slice()) {
        (Method::Options, _) => state.cors.preflight(),
        (Method::Get, []) => handle_root(),
        (Method::Get, ["thoughts"]) => handle_list(state).await,
        (Method::Post, ["thoughts"]) => {
            handle_create(request.body().map(String::as_str), state).await
        }
        (Method::Post, ["thoughts", id, "like"]) => handle_like(id, state).await,
        (method, _) => Response::error(
            NOT_FOUND,
            &format!("Cannot {method} {}", request.path()),
        ),
    }
}
