use fxdesk_core::request::{OpenAccountRequest, RequestCheck, UpdateAccountRequest};

use super::{Desk, settle};
use crate::engine::AccountingEngine;
use crate::error::{ActionError, EngineError};
use crate::state::State;

impl<E: AccountingEngine> Desk<E> {
    /// Opens a ledger account.
    pub async fn open_account(&self, request: OpenAccountRequest) -> State {
        settle("open_account", self.try_open_account(&request).await)
    }

    async fn try_open_account(&self, request: &OpenAccountRequest) -> Result<String, ActionError> {
        request.check()?;
        let account = self.engine.open_account(request).await?;
        Ok(format!("Account {} created Successfully", account.initials))
    }

    /// Updates an account, provided nobody changed it since `request.version`
    /// was read. A stale version is a conflict and is never retried.
    pub async fn update_account(&self, request: UpdateAccountRequest) -> State {
        settle("update_account", self.try_update_account(&request).await)
    }

    async fn try_update_account(&self, request: &UpdateAccountRequest) -> Result<String, ActionError> {
        request.check()?;
        let current = self.engine.get_account(&request.initials).await?;
        if current.version != request.version {
            return Err(EngineError::Conflict(stale_message(&request.initials)).into());
        }

        let account = self
            .engine
            .update_account(request)
            .await
            .map_err(|err| match err {
                EngineError::Conflict(_) => EngineError::Conflict(stale_message(&request.initials)),
                other => other,
            })?;
        Ok(format!("Account {} updated Successfully", account.initials))
    }
}

fn stale_message(initials: &str) -> String {
    format!("Account {initials} was changed by someone else. Reload it and try again")
}
