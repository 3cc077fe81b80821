//! The uniform result of every desk action.

use fxdesk_core::request::FieldError;
use fxdesk_shared::AppError;
use fxdesk_shared::error::GENERIC_FAILURE_MESSAGE;
use serde::{Deserialize, Serialize};

use crate::dto::ItemState;
use crate::error::ActionError;

/// Outcome of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The engine accepted the request.
    Success,
    /// Nothing was changed.
    Error,
}

/// Category of a failed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Rejected locally before any network call.
    Validation,
    /// Not allowed from the record's current state.
    Rejected,
    /// The record changed since it was read.
    Conflict,
    /// Refused by the engine.
    Server,
    /// Transport or unexpected failure.
    Unknown,
}

/// What an action reports to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Success or error.
    pub status: Status,
    /// Failure category, absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    /// Message to display.
    pub message: String,
    /// Field errors, keyed by request path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl State {
    /// A successful outcome.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            kind: None,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// A failed outcome.
    #[must_use]
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            kind: Some(kind),
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// True when the engine accepted the request.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

impl From<ActionError> for State {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Validation(failure) => Self {
                errors: failure.errors,
                ..Self::failure(FailureKind::Validation, failure.message)
            },
            ActionError::Workflow(err) => Self::failure(FailureKind::Rejected, err.to_string()),
            ActionError::Refused(message) => Self::failure(FailureKind::Rejected, message),
            ActionError::Engine(err) => {
                let errors = err.field_errors().to_vec();
                let err = AppError::from(err);
                let kind = match &err {
                    AppError::Conflict(_) => FailureKind::Conflict,
                    _ if err.is_internal() => FailureKind::Unknown,
                    _ => FailureKind::Server,
                };
                Self {
                    errors,
                    ..Self::failure(kind, err.user_message())
                }
            }
            ActionError::Notes(_) => Self::failure(FailureKind::Unknown, GENERIC_FAILURE_MESSAGE),
        }
    }
}

/// Outcome of a grouped payment or commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// One entry per submitted code, in submission order.
    pub states: Vec<ItemState>,
    /// Overall result: success when every item succeeded.
    pub state: State,
}

impl BatchOutcome {
    /// State of one code, if it was submitted.
    #[must_use]
    pub fn state_of(&self, code: &str) -> Option<u8> {
        self.states
            .iter()
            .find(|item| item.code == code)
            .map(|item| item.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use fxdesk_core::request::ValidationFailure;
    use fxdesk_core::workflow::{TransactionState, WorkflowError};
    use serde_json::json;

    #[test]
    fn test_validation_keeps_field_errors() {
        let state = State::from(ActionError::Validation(ValidationFailure {
            message: "Invalid Review".to_string(),
            errors: vec![FieldError::new("notes", "should have comments")],
        }));
        assert!(!state.is_success());
        assert_eq!(state.kind, Some(FailureKind::Validation));
        assert_eq!(state.errors[0].path, "notes");
    }

    #[test]
    fn test_engine_message_is_verbatim() {
        let state = State::from(ActionError::Engine(EngineError::Api {
            status: 400,
            message: "Account AGT1 is closed".to_string(),
            errors: vec![],
        }));
        assert_eq!(state.kind, Some(FailureKind::Server));
        assert_eq!(state.message, "Account AGT1 is closed");
    }

    #[test]
    fn test_transport_is_generic() {
        let state = State::from(ActionError::Engine(EngineError::Transport("timeout".to_string())));
        assert_eq!(state.kind, Some(FailureKind::Unknown));
        assert_eq!(state.message, GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_conflict_is_distinct() {
        let state = State::from(ActionError::Engine(EngineError::Conflict("Account changed".to_string())));
        assert_eq!(state.kind, Some(FailureKind::Conflict));
        assert_eq!(state.message, "Account changed");
    }

    #[test]
    fn test_workflow_refusal() {
        let state = State::from(ActionError::Workflow(WorkflowError::NotEditable(
            TransactionState::Paid,
        )));
        assert_eq!(state.kind, Some(FailureKind::Rejected));
    }

    #[test]
    fn test_wire_shape() {
        assert_eq!(
            serde_json::to_value(State::success("Trade Successful")).unwrap(),
            json!({"status": "success", "message": "Trade Successful"})
        );
        let failed = serde_json::to_value(State::failure(FailureKind::Conflict, "stale")).unwrap();
        assert_eq!(failed["status"], "error");
        assert_eq!(failed["kind"], "conflict");
    }
}
