//! Desk actions.
//!
//! Every action validates its request, reads the current record, runs the
//! lifecycle guard, and only then calls the engine. Whatever happens, the
//! caller gets a [`State`]; nothing escapes as an error.

mod accounts;
mod trades;
mod transactions;

use std::sync::Arc;

use fxdesk_shared::types::UserId;
use tracing::{error, info, warn};

use crate::engine::AccountingEngine;
use crate::error::{ActionError, EngineError};
use crate::state::State;

/// The operations available to one operator.
#[derive(Debug)]
pub struct Desk<E> {
    engine: Arc<E>,
    operator: UserId,
}

impl<E> Clone for Desk<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            operator: self.operator,
        }
    }
}

impl<E: AccountingEngine> Desk<E> {
    /// Creates a desk acting as `operator`.
    pub fn new(engine: Arc<E>, operator: UserId) -> Self {
        Self { engine, operator }
    }

    /// The operator recorded in notes.
    #[must_use]
    pub fn operator(&self) -> UserId {
        self.operator
    }

    /// The engine behind this desk.
    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

/// Logs the outcome of an action and turns it into a [`State`].
fn settle(action: &'static str, result: Result<String, ActionError>) -> State {
    match result {
        Ok(message) => {
            info!(action, %message, "Action succeeded");
            State::success(message)
        }
        Err(err) => {
            match &err {
                ActionError::Engine(EngineError::Transport(_) | EngineError::Decode(_))
                | ActionError::Notes(_) => error!(action, error = %err, "Action failed"),
                _ => warn!(action, error = %err, "Action refused"),
            }
            State::from(err)
        }
    }
}
