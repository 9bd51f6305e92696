use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::authentication::errors::GuardError;
use crate::inbound::http::router::AppState;

/// Rejects the request with 401 unless it carries a valid bearer token.
pub async fn require_bearer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| GuardError::MalformedHeader))
        .transpose()
        .and_then(|value| state.auth_guard.authorize(value));

    match header {
        Ok(subject) => {
            tracing::debug!(subject = %subject, "Bearer token accepted");
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(error = %e, uri = %req.uri(), "Rejected unauthorized request");
            Err(ApiError::from(e).into_response())
        }
    }
}
