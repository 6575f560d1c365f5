//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a collection slug.
pub const MAX_SLUG_LENGTH: usize = 120;

/// Turns free text into a URL-safe slug.
///
/// Lowercases, replaces whitespace runs with `-`, drops anything that is not
/// alphanumeric, `_` or `-`, and collapses repeated hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = false;

    for ch in text.trim().to_lowercase().chars() {
        let mapped = if ch.is_whitespace() || ch == '-' {
            Some('-')
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            Some(ch)
        } else {
            None
        };

        match mapped {
            Some('-') => {
                if !last_dash {
                    slug.push('-');
                }
                last_dash = true;
            }
            Some(c) => {
                slug.push(c);
                last_dash = false;
            }
            None => {}
        }
    }

    slug.trim_matches('-').chars().take(MAX_SLUG_LENGTH).collect()
}

/// Validates that a string field is not only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}
