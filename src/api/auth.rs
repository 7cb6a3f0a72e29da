use crate::api::{error::ApiError, AppState};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Guard for mutating routes. Without a configured key every request passes.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if provided != Some(expected) {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request without a valid API key"
        );
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
