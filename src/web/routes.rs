//! Contains all the routes that this application can handle.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode},
    routing::get,
    Router,
};

use super::types::{IntakeRequest, IntakeResponse};
use crate::AppState;

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server.
/// Everything that isn't `GET /health-check` goes to the waitlist handler, whatever the path.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/health-check", get(health_check).fallback(intake))
        .fallback(intake)
        .with_state(app_state)
}

async fn intake(
    State(app_state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> IntakeResponse {
    let request = match body {
        Ok(body) => IntakeRequest::new(method, body),
        Err(rejection) => IntakeRequest::unreadable(method, rejection),
    };

    app_state.waitlist.handle(request).await
}
