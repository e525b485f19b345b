use crate::server::response::ApiError;

const MAX_SLUG_LEN: usize = 100;

/// Slugs and page ids share the same restricted character class:
/// lowercase letters, digits, and hyphens.
#[must_use]
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_SLUG_LEN
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn validate_page_id(id: &str) -> Result<(), ApiError> {
    if is_valid_slug(id) {
        Ok(())
    } else {
        Err(ApiError::bad_request(
            "Page id can only contain lowercase letters, digits, and hyphens",
        ))
    }
}

pub fn validate_slug(slug: &str) -> Result<(), ApiError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(ApiError::bad_request(
            "Slug can only contain lowercase letters, digits, and hyphens",
        ))
    }
}
