//! Promo code value object.
//!
//! Represents a promotional code that grants free membership.
//! Format: PREFIX-RANDOM (e.g., WORKSHOP2026-A7K9M3)
//!
//! # Validation Rules
//!
//! - Format: `PREFIX-RANDOM`
//! - PREFIX: 4-20 uppercase alphanumeric characters
//! - RANDOM: 6 uppercase alphanumeric characters
//! - Total length: 11-27 characters (including hyphen)

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};

/// A validated promotional code.
///
/// Promo codes grant free membership access and are typically
/// distributed at workshops or promotional events.
///
/// # Format
///
/// `PREFIX-RANDOM` where:
/// - PREFIX: Event/campaign identifier (e.g., "WORKSHOP2026")
/// - RANDOM: 6-character unique suffix (e.g., "A7K9M3")
///
/// # Example
///
/// ```ignore
/// let code = PromoCode::try_new("WORKSHOP2026-A7K9M3")?;
/// assert_eq!(code.prefix(), "WORKSHOP2026");
/// assert_eq!(code.suffix(), "A7K9M3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromoCode {
    /// The full promo code string (normalized to uppercase).
    code: String,
    /// The prefix portion before the hyphen.
    prefix: String,
    /// The random suffix after the hyphen.
    suffix: String,
}

impl PromoCode {
    /// Creates a new PromoCode from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - Code is empty
    /// - Code doesn't contain exactly one hyphen
    /// - Prefix is too short (< 4 chars) or too long (> 20 chars)
    /// - Suffix is not exactly 6 characters
    /// - Characters are not alphanumeric
    pub fn try_new(code: &str) -> Result<Self, ValidationError> {
        // 1. Check not empty
        if code.is_empty() {
            return Err(ValidationError::empty_field("promo_code"));
        }

        // 2. Normalize to uppercase
        let normalized = code.to_uppercase();

        // 3. Split on hyphen
        let parts: Vec<&str> = normalized.split('-').collect();
        if parts.len() != 2 {
            return Err(ValidationError::invalid_format(
                "promo_code",
                format!("expected format PREFIX-RANDOM, got '{}'", normalized),
            ));
        }

        // Convert to owned strings early to avoid borrow issues
        let prefix = parts[0].to_string();
        let suffix = parts[1].to_string();

        // 4. Validate prefix length (4-20 chars)
        if prefix.len() < 4 || prefix.len() > 20 {
            return Err(ValidationError::out_of_range(
                "promo_code_prefix_length",
                4,
                20,
                prefix.len() as i32,
            ));
        }

        // 5. Validate suffix length (exactly 6 chars)
        if suffix.len() != 6 {
            return Err(ValidationError::out_of_range(
                "promo_code_suffix_length",
                6,
                6,
                suffix.len() as i32,
            ));
        }

        // 6. Validate prefix is alphanumeric
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::invalid_format(
                "promo_code_prefix",
                "alphanumeric characters only",
            ));
        }

        // 7. Validate suffix is alphanumeric
        if !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::invalid_format(
                "promo_code_suffix",
                "alphanumeric characters only",
            ));
        }

        Ok(Self {
            code: normalized,
            prefix,
            suffix,
        })
    }

    /// Returns the full promo code string.
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Returns the prefix portion of the code.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the suffix (random) portion of the code.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl std::fmt::Display for PromoCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl TryFrom<&str> for PromoCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl TryFrom<String> for PromoCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}
