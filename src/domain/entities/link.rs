//! Link entity representing a short code to target URL mapping.

use chrono::{DateTime, Utc};

/// A persisted short link with its visit statistics.
///
/// Once created, only `click_count` and `last_clicked_at` ever change.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub code: String,
    pub target_url: String,
    pub click_count: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        code: String,
        target_url: String,
        click_count: i64,
        last_clicked_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            target_url,
            click_count,
            last_clicked_at,
            created_at,
        }
    }
}

/// Input data for creating a new link.
///
/// The store assigns `click_count = 0`, `last_clicked_at = NULL` and
/// `created_at = now()`.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
}
