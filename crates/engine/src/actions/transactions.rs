use fxdesk_core::request::{
    CancellationRequest, GroupedPaymentItem, PaymentRequest, RequestCheck, TransactionRequest,
    TransactionReviewRequest, TransactionUpdateRequest,
};
use fxdesk_core::workflow::{
    PaymentEntry, PaymentInput, TransactionState, TransactionWorkflow, WorkflowError,
};
use fxdesk_shared::types::TransactionCode;
use futures::future::join_all;
use tracing::info;

use super::{Desk, settle};
use crate::dto::ItemState;
use crate::engine::AccountingEngine;
use crate::error::ActionError;
use crate::state::{BatchOutcome, FailureKind, State};

impl<E: AccountingEngine> Desk<E> {
    /// Creates a transaction.
    pub async fn add_transaction(&self, request: TransactionRequest) -> State {
        settle("add_transaction", self.try_add_transaction(&request).await)
    }

    async fn try_add_transaction(&self, request: &TransactionRequest) -> Result<String, ActionError> {
        request.check()?;
        let created = self.engine.request_transaction(request).await?;
        Ok(format!(
            "{} Transaction {} added successfully",
            created.transaction_type.as_str(),
            created.code
        ))
    }

    /// Approves, rejects or cancels a transaction in Review.
    pub async fn review_transaction(&self, request: TransactionReviewRequest) -> State {
        settle("review_transaction", self.try_review_transaction(&request).await)
    }

    async fn try_review_transaction(&self, request: &TransactionReviewRequest) -> Result<String, ActionError> {
        request.check()?;
        let code = TransactionCode::from(request.code.as_str());
        let current = self
            .engine
            .get_transaction(&code, request.transaction_type)
            .await?;
        TransactionWorkflow::review(
            current.state,
            request.state.decision(),
            request.notes.as_deref().unwrap_or_default(),
            self.operator,
        )
        .map_err(|err| match err {
            WorkflowError::InvalidTransition { .. } => {
                ActionError::Refused("Transaction already reviewed".to_string())
            }
            other => other.into(),
        })?;

        let reviewed = self.engine.review_transaction(request).await?;
        Ok(format!(
            "Transaction {} has been {} successfully",
            reviewed.code,
            request.state.as_str()
        ))
    }

    /// Corrects the amount of a transaction in Review or Rejected.
    pub async fn update_transaction(&self, request: TransactionUpdateRequest) -> State {
        settle("update_transaction", self.try_update_transaction(&request).await)
    }

    async fn try_update_transaction(&self, request: &TransactionUpdateRequest) -> Result<String, ActionError> {
        request.check()?;
        let code = TransactionCode::from(request.code.as_str());
        let current = self
            .engine
            .get_transaction(&code, request.transaction_type)
            .await?;
        TransactionWorkflow::edit(current.state, request.amount.amount)?;

        let updated = self.engine.update_transaction(request).await?;
        Ok(format!("Transaction {} updated successfully", updated.code))
    }

    /// Records a payment. The transaction stays Pending until fully paid.
    pub async fn pay_transaction(&self, code: &TransactionCode, request: PaymentRequest) -> State {
        settle("pay_transaction", self.try_pay_transaction(code, &request).await)
    }

    async fn try_pay_transaction(
        &self,
        code: &TransactionCode,
        request: &PaymentRequest,
    ) -> Result<String, ActionError> {
        request.check()?;
        let (current, payments) = futures::try_join!(
            self.engine.get_transaction(code, request.payment_type),
            self.engine.list_payments(code, request.payment_type),
        )?;
        let entries: Vec<PaymentEntry> = payments.iter().map(|payment| payment.entry()).collect();
        let action = TransactionWorkflow::pay(
            current.state,
            current.transaction_type,
            current.payable_amount(),
            &entries,
            PaymentInput {
                amount: request.amount,
                message: request.notes.clone().unwrap_or_default(),
            },
            self.operator,
        )?;

        let payment = self.engine.pay_transaction(code, request).await?;
        info!(
            %code,
            amount = %payment.amount,
            settled = action.new_state() == TransactionState::Paid,
            "Payment recorded"
        );
        Ok(format!(
            "{} Transaction {} paid {} successfully",
            current.transaction_type.as_str(),
            code,
            payment.amount
        ))
    }

    /// Cancels a transaction in Review or Pending.
    pub async fn cancel_transaction(&self, request: CancellationRequest) -> State {
        settle("cancel_transaction", self.try_cancel_transaction(&request).await)
    }

    async fn try_cancel_transaction(&self, request: &CancellationRequest) -> Result<String, ActionError> {
        request.check()?;
        let code = TransactionCode::from(request.code.as_str());
        let current = self
            .engine
            .get_transaction(&code, request.transaction_type)
            .await?;
        if !TransactionWorkflow::is_valid_transition(current.state, TransactionState::Cancelled) {
            return Err(WorkflowError::InvalidTransition {
                from: current.state,
                to: TransactionState::Cancelled,
            }
            .into());
        }

        let cancelled = self.engine.cancel_transaction(request).await?;
        Ok(format!(
            "{} Transaction {} has been cancelled",
            cancelled.transaction_type.as_str(),
            cancelled.code
        ))
    }

    /// Cancels one payment. The transaction reopens once no payment is live.
    pub async fn cancel_payment(&self, payment_id: &str, request: CancellationRequest) -> State {
        settle("cancel_payment", self.try_cancel_payment(payment_id, &request).await)
    }

    async fn try_cancel_payment(
        &self,
        payment_id: &str,
        request: &CancellationRequest,
    ) -> Result<String, ActionError> {
        request.check()?;
        let code = TransactionCode::from(request.code.as_str());
        let (current, payments) = futures::try_join!(
            self.engine.get_transaction(&code, request.transaction_type),
            self.engine.list_payments(&code, request.transaction_type),
        )?;
        let target = payments
            .iter()
            .find(|payment| payment.id == payment_id)
            .ok_or_else(|| ActionError::Refused(format!("Payment {payment_id} not found on {code}")))?;
        let others: Vec<PaymentEntry> = payments
            .iter()
            .filter(|payment| payment.id != payment_id)
            .map(|payment| payment.entry())
            .collect();
        TransactionWorkflow::cancel_payment(
            current.state,
            &target.entry(),
            &others,
            &request.reason_text(),
            &request.description,
            self.operator,
        )?;

        let cancelled = self.engine.cancel_payment(payment_id, request).await?;
        Ok(format!(
            "Payment for transaction {} with code {} has been cancelled",
            cancelled.transaction_type.as_str(),
            code
        ))
    }

    /// Pays several transactions at once.
    ///
    /// Each code may appear once. Payments are sent concurrently and reported
    /// per code: a failure never undoes a payment that went through.
    pub async fn group_pay(&self, items: Vec<GroupedPaymentItem>) -> BatchOutcome {
        if let Err(invalid) = items.check() {
            return BatchOutcome {
                states: Vec::new(),
                state: settle("group_pay", Err(invalid.into())),
            };
        }

        let results = join_all(items.iter().map(|item| async move {
            let code = TransactionCode::from(item.code.as_str());
            (code.to_string(), self.pay_transaction(&code, item.request.clone()).await)
        }))
        .await;
        batch_outcome("payment", results)
    }
}

/// Folds per-item states into one outcome.
pub(super) fn batch_outcome(noun: &str, results: Vec<(String, State)>) -> BatchOutcome {
    let total = results.len();
    let states: Vec<ItemState> = results
        .into_iter()
        .map(|(code, state)| ItemState {
            code,
            state: if state.is_success() {
                ItemState::SUCCEEDED
            } else {
                ItemState::FAILED
            },
        })
        .collect();
    let failed = states.iter().filter(|item| !item.succeeded()).count();
    let state = if failed == 0 {
        State::success(format!("Grouped {noun} completed for {total} items"))
    } else {
        State::failure(
            FailureKind::Server,
            format!("{failed} of {total} grouped {noun}s failed"),
        )
    };
    BatchOutcome { states, state }
}
