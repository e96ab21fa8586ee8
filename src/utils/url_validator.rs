//! Target URL validation.
//!
//! Accepted URLs are returned in the `url` crate's serialized form, which is
//! what gets stored and later sent back as the redirect `Location`. That form
//! is always printable ASCII: non-ASCII path and query characters are
//! percent-encoded and IDN hosts are punycoded.

use url::Url;

/// Schemes a target URL may use.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ftp"];

/// Longest target URL accepted.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during target URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported protocol '{0}'")]
    UnsupportedProtocol(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("URL contains control characters")]
    ControlCharacters,
}

/// Validates a target URL and returns the serialized form to store.
///
/// # Rules
///
/// 1. No control characters once surrounding whitespace is trimmed
/// 2. Must be an absolute URL with an explicit scheme
/// 3. Scheme must be one of [`ALLOWED_SCHEMES`]
/// 4. Must have a host
///
/// # Errors
///
/// Returns a [`UrlValidationError`] describing the first rule violated.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_target_url(" https://example.com/page ").unwrap(), "https://example.com/page");
/// assert_eq!(validate_target_url("https://example.com/café").unwrap(), "https://example.com/caf%C3%A9");
/// assert!(validate_target_url("example.com").is_err());
/// ```
pub fn validate_target_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    // `Url::parse` silently drops tabs and newlines, so check before parsing.
    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacters);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlValidationError::UnsupportedProtocol(
            url.scheme().to_string(),
        ));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url.into())
}
