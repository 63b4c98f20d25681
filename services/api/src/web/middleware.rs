//! services/api/src/web/middleware.rs
//!
//! Identification middleware for protecting routes.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

/// Middleware that extracts the caller's user id from the `x-user-id` header.
///
/// If present and well-formed, inserts the user_id into request extensions
/// for handlers to use. If missing or malformed, returns 401 Unauthorized.
pub async fn require_user(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let header_value = req
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let user_id = Uuid::parse_str(header_value).map_err(|e| {
        warn!("Rejected request with malformed x-user-id header: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}
