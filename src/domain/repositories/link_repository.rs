//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the link store.
///
/// Implementations must enforce code uniqueness as a hard constraint,
/// independent of any pre-check done by callers.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - In-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link and returns the persisted row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already assigned.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Returns whether any link currently uses `code`.
    ///
    /// Only an optimization for code allocation; never authoritative.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Increments `click_count` and sets `last_clicked_at = now()`.
    ///
    /// Returns `Ok(false)` when no row matched (for example, the link was
    /// deleted concurrently). That case is not an error.
    async fn record_visit(&self, code: &str) -> Result<bool, AppError>;

    /// Deletes a link by code. Returns `Ok(true)` if a link was removed.
    async fn delete_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Lists all links, newest first.
    async fn list_all(&self) -> Result<Vec<Link>, AppError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
