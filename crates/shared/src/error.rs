//! Desk-wide failure categories and the message each one shows the operator.

use thiserror::Error;

/// Message shown when a failure carries nothing the user can act on.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong! Please try again";

/// Why something the desk asked for did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// The engine rejected the session token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// No such transaction, trade, wallet or account.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input refused before or by the engine.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Lifecycle or balance rule refused the change.
    #[error("refused: {0}")]
    BusinessRule(String),

    /// The record changed since it was read.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The accounting engine answered with an error.
    #[error("engine error: {0}")]
    ExternalService(String),

    /// Transport failure or an answer the desk could not read.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the details are not fit for the operator.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    /// Returns the message to show the user.
    ///
    /// Server and validation messages are surfaced verbatim. Internal failures
    /// are replaced by [`GENERIC_FAILURE_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::BusinessRule(msg)
            | Self::Conflict(msg)
            | Self::ExternalService(msg) => msg.clone(),
            Self::Internal(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
