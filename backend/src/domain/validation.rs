//! Shared validation helpers for draft inputs.

use rust_decimal::Decimal;

use super::Error;

/// Reason a draft field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftValidationError {
    /// Required text was blank once trimmed.
    #[error("{field} must not be empty")]
    Blank {
        /// Offending input field.
        field: &'static str,
    },
    /// Text exceeded the accepted length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending input field.
        field: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
    /// A monetary amount was negative.
    #[error("{field} must not be negative")]
    Negative {
        /// Offending input field.
        field: &'static str,
    },
    /// A monetary amount exceeded [`AMOUNT_MAX`].
    #[error("{field} must be at most {max}")]
    TooLarge {
        /// Offending input field.
        field: &'static str,
        /// Maximum accepted amount.
        max: i64,
    },
    /// A count was below its minimum.
    #[error("{field} must be at least {min}")]
    TooSmall {
        /// Offending input field.
        field: &'static str,
        /// Minimum accepted value.
        min: i64,
    },
    /// Email did not look like an address.
    #[error("{field} must look like name@example.com")]
    InvalidEmail {
        /// Offending input field.
        field: &'static str,
    },
}

impl DraftValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field }
            | Self::TooLong { field, .. }
            | Self::Negative { field }
            | Self::TooLarge { field, .. }
            | Self::TooSmall { field, .. }
            | Self::InvalidEmail { field } => field,
        }
    }
}

impl From<DraftValidationError> for Error {
    fn from(value: DraftValidationError) -> Self {
        Self::invalid_request(value.to_string())
            .with_details(serde_json::json!({ "field": value.field() }))
    }
}

/// Maximum length of titles, names, labels and city names.
pub const TEXT_MAX: usize = 200;

/// Largest accepted monetary amount, in whole currency units.
pub const AMOUNT_MAX: i64 = 1_000_000_000_000_000;

/// Trim `raw` and require it to be non-blank and at most [`TEXT_MAX`] chars.
pub(crate) fn required_text(
    field: &'static str,
    raw: &str,
) -> Result<String, DraftValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DraftValidationError::Blank { field });
    }
    if trimmed.chars().count() > TEXT_MAX {
        return Err(DraftValidationError::TooLong {
            field,
            max: TEXT_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// Trim optional free text, collapsing blank values to `None`.
pub(crate) fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Require an amount within `0..=AMOUNT_MAX`.
pub(crate) fn monetary_amount(
    field: &'static str,
    amount: Decimal,
) -> Result<Decimal, DraftValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DraftValidationError::Negative { field });
    }
    if amount > Decimal::from(AMOUNT_MAX) {
        return Err(DraftValidationError::TooLarge {
            field,
            max: AMOUNT_MAX,
        });
    }
    Ok(amount)
}
