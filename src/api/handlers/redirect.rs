//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the link by code
/// 2. Increment its click counter and set `last_clicked_at`
/// 3. Return 302 Found with `Location: target_url`
///
/// A link deleted between steps 1 and 2 still redirects; the visit is
/// simply not counted.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 if the stored target cannot be sent as a `Location` header.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target_url = state.link_service.resolve_and_record_visit(&code).await?;

    let location = HeaderValue::try_from(target_url).map_err(|e| {
        tracing::error!(code = %code, error = %e, "Stored target is not a valid Location");
        AppError::internal("Stored target URL is invalid", json!({ "code": code }))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
