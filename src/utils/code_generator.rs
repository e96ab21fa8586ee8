//! Short code generation and validation.

use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

/// The 62-character alphanumeric alphabet codes are drawn from.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

/// Top-level path segments owned by the management routes. A link with one of
/// these codes could never be reached through `GET /{code}`.
pub const RESERVED_CODES: &[&str] = &["health", "links"];

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{6,8}$").expect("valid code regex"));

/// Draws `length` characters uniformly at random from `alphabet`.
///
/// `alphabet` must be non-empty ASCII.
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], length: usize) -> String {
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// Generates a random 6-character alphanumeric code using the thread RNG.
pub fn generate_code() -> String {
    generate_code_with(&mut rand::rng(), ALPHABET, GENERATED_CODE_LENGTH)
}

/// Returns true if `code` is 6 to 8 ASCII letters or digits.
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Returns true if `code` collides with a management route segment.
pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Validates a caller-supplied code.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the format is wrong or the code is reserved.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if !is_valid_code(code) {
        return Err(AppError::bad_request(
            "Code must be 6-8 alphanumeric characters",
            json!({ "code": code }),
        ));
    }

    if is_reserved_code(code) {
        return Err(AppError::bad_request(
            "Code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
