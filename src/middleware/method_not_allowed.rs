use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};

use crate::error::{ApiError, ErrorVerbosityProvider, MethodNotAllowedError};

/// Middleware to map axum's bare `405 Method Not Allowed` responses to our [`ApiError`].
///
/// Routes like `/books/:isbn` only accept `GET`, `PUT` and `DELETE`; anything else ends up here.
pub async fn method_not_allowed<S: ErrorVerbosityProvider>(
    State(state): State<S>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let resp = next.run(req).await;

    if resp.status() != StatusCode::METHOD_NOT_ALLOWED {
        return Ok(resp);
    }

    tracing::debug!(%method, %path, "Method not allowed");

    Err(MethodNotAllowedError::new(state.error_verbosity()).into())
}
