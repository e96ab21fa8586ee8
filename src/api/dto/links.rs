//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Request to create a short link.
///
/// Format checks on `target_url` and `code` are done by
/// [`crate::application::services::LinkService::create_link`]; this DTO only
/// bounds the payload size.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Absolute URL to redirect to, including the protocol.
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub target_url: String,

    /// Optional custom short code (6-8 alphanumeric characters).
    #[serde(default)]
    pub code: Option<String>,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub target_url: String,
    pub short_url: String,
    pub click_count: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, short_url: String) -> Self {
        Self {
            code: link.code,
            target_url: link.target_url,
            short_url,
            click_count: link.click_count,
            last_clicked_at: link.last_clicked_at,
            created_at: link.created_at,
        }
    }
}

/// Confirmation returned after a delete.
#[derive(Debug, Serialize)]
pub struct DeleteLinkResponse {
    pub message: String,
    pub code: String,
}
