//! Link allocation, lookup, visit recording and deletion.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{
    generate_code, is_reserved_code, is_valid_code, validate_custom_code,
};
use crate::utils::url_validator::validate_target_url;

/// Upper bound on random code candidates tried per create request.
///
/// Every candidate counts, including one discarded for being reserved.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

type CodeSource = Box<dyn Fn() -> String + Send + Sync>;

/// Service for creating, resolving and deleting short links.
///
/// Code uniqueness ultimately rests on the store: the existence checks done
/// here only avoid pointless inserts, and an insert that loses a race is
/// reported as [`AppError::Conflict`].
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    base_url: String,
    code_source: CodeSource,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short links are served from, e.g.
    /// `https://s.example.com`.
    pub fn new(link_repository: Arc<dyn LinkRepository>, base_url: impl Into<String>) -> Self {
        Self {
            link_repository,
            base_url: base_url.into(),
            code_source: Box::new(generate_code),
        }
    }

    /// Replaces the random code generator, e.g. with a seeded one.
    pub fn with_code_source(
        mut self,
        source: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.code_source = Box::new(source);
        self
    }

    /// Allocates a code for `target_url` and stores the link.
    ///
    /// An empty `custom_code` is treated as omitted.
    ///
    /// # Code Allocation
    ///
    /// - A custom code must be 6-8 ASCII letters or digits and not reserved
    /// - Otherwise a random 6-character code is drawn, retrying on collision
    ///   up to [`MAX_GENERATION_ATTEMPTS`] times
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL or custom code is malformed.
    /// Nothing is written to the store in that case.
    ///
    /// Returns [`AppError::Conflict`] if the custom code is taken, or if the
    /// insert itself hits the uniqueness constraint.
    ///
    /// Returns [`AppError::ExhaustedRetries`] if every random candidate collided.
    pub async fn create_link(
        &self,
        target_url: &str,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        let target_url = validate_target_url(target_url).map_err(|e| {
            AppError::bad_request(
                "Invalid URL. Must include protocol (http:// or https://)",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let custom_code = custom_code.filter(|c| !c.is_empty());
        if let Some(code) = &custom_code {
            validate_custom_code(code)?;
        }

        let code = match custom_code {
            Some(code) => {
                if self.link_repository.exists(&code).await? {
                    return Err(AppError::conflict(
                        "Code already exists",
                        json!({ "code": code }),
                    ));
                }
                code
            }
            None => self.generate_unique_code().await?,
        };

        let new_link = NewLink {
            code: code.clone(),
            target_url,
        };

        let link = self
            .link_repository
            .create(new_link)
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => {
                    AppError::conflict("Code already exists", json!({ "code": code }))
                }
                other => other,
            })?;

        info!(code = %link.code, target_url = %link.target_url, "Link created");
        Ok(link)
    }

    /// Looks up the target for `code` and records a visit.
    ///
    /// The returned URL is the one read before the counter update. If the
    /// link is deleted between the two steps the update touches no rows and
    /// the redirect is still honoured.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve_and_record_visit(&self, code: &str) -> Result<String, AppError> {
        let link = self.get_link(code).await?;

        if !self.link_repository.record_visit(code).await? {
            debug!(code, "Link removed before visit was recorded");
        }

        Ok(link.target_url)
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        if !is_valid_code(code) {
            return Err(link_not_found(code));
        }

        self.link_repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| link_not_found(code))
    }

    /// Lists all links, newest first.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_all().await
    }

    /// Deletes a link by code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if nothing was deleted.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if !is_valid_code(code) || !self.link_repository.delete_by_code(code).await? {
            return Err(link_not_found(code));
        }

        info!(code, "Link deleted");
        Ok(())
    }

    /// Checks that the link store answers.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    /// Draws random codes until one is unused, up to [`MAX_GENERATION_ATTEMPTS`].
    ///
    /// A reserved candidate is discarded without a store lookup and uses up
    /// its attempt.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = (self.code_source)();

            if is_reserved_code(&code) {
                debug!(attempt, code = %code, "Generated code is reserved");
                continue;
            }

            if !self.link_repository.exists(&code).await? {
                return Ok(code);
            }

            debug!(attempt, code = %code, "Generated code already in use");
        }

        warn!(
            attempts = MAX_GENERATION_ATTEMPTS,
            "Could not generate a unique code"
        );
        Err(AppError::exhausted_retries(
            "Failed to generate unique code",
            json!({ "attempts": MAX_GENERATION_ATTEMPTS }),
        ))
    }
}

fn link_not_found(code: &str) -> AppError {
    AppError::not_found("Link not found", json!({ "code": code }))
}
