//! Accounting engine and desk action error types.

use fxdesk_core::request::{FieldError, ValidationFailure};
use fxdesk_core::workflow::{NoteError, WorkflowError};
use fxdesk_shared::AppError;
use thiserror::Error;

/// Errors returned by an [`AccountingEngine`](crate::AccountingEngine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine answered with an error status.
    #[error("{message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Server message, shown verbatim.
        message: String,
        /// Field errors the server could attribute to a path.
        errors: Vec<FieldError>,
    },

    /// The record changed since it was read.
    #[error("{0}")]
    Conflict(String),

    /// The request never got an answer.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The answer could not be decoded.
    #[error("Invalid engine response: {0}")]
    Decode(String),
}

impl EngineError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            Self::Conflict(_) => 409,
            Self::Transport(_) | Self::Decode(_) => 502,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Api { .. } => "ENGINE_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Transport(_) => "ENGINE_UNREACHABLE",
            Self::Decode(_) => "ENGINE_BAD_RESPONSE",
        }
    }

    /// Field errors reported by the engine.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Api { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Api {
                status: 401 | 403,
                message,
                ..
            } => Self::Unauthorized(message),
            EngineError::Api {
                status: 404,
                message,
                ..
            } => Self::NotFound(message),
            EngineError::Api {
                status: 400 | 422,
                message,
                ..
            } => Self::Validation(message),
            EngineError::Api { message, .. } => Self::ExternalService(message),
            EngineError::Conflict(message) => Self::Conflict(message),
            EngineError::Transport(message) | EngineError::Decode(message) => {
                Self::Internal(message)
            }
        }
    }
}

/// Why a desk action did not go through.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The request failed local validation and was never sent.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// The transition is not allowed from the current state.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The engine refused or could not be reached.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A stored notes trail could not be read.
    #[error(transparent)]
    Notes(#[from] NoteError),

    /// Refused with a message meant for the operator.
    #[error("{0}")]
    Refused(String),
}
