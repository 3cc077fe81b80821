//! Converter error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when a quote is evaluated from untrusted input.
///
/// The converters themselves never fail: a zero divisor yields zero. Only
/// inputs that no form could produce are rejected here: negative values,
/// and values too large for the products to fit in a [`Decimal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// A rate or amount was negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeInput {
        /// Name of the edited field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// A rate or amount was larger than any desk figure.
    #[error("{field} must be at most {max}, got {value}")]
    OutOfRange {
        /// Name of the edited field.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
        /// Largest accepted value.
        max: Decimal,
    },

    /// The quote carried no edits at all.
    #[error("Quote has no edits")]
    NoEdits,
}

impl ConversionError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeInput { .. } => "NEGATIVE_INPUT",
            Self::OutOfRange { .. } => "OUT_OF_RANGE",
            Self::NoEdits => "NO_EDITS",
        }
    }
}
