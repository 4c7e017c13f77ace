//! Bearer API-key authentication.
//!
//! A single shared key guards the `/api` routes. With no key configured
//! the panel is open, which matches running it on a trusted host.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use fontpanel_core::{AppState, ConfigProvider};

use crate::error::ApiError;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Compare two byte strings in time independent of where they differ.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Middleware rejecting requests without the configured API key.
pub async fn require_api_key<C: ConfigProvider>(
    State(state): State<AppState<C>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_key() {
        let provided = bearer_token(request.headers())
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
        if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
            return Err(ApiError::unauthorized("Incorrect API Key"));
        }
    }
    Ok(next.run(request).await)
}
