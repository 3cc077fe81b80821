//! Transaction lifecycle state machine.
//!
//! Every function validates a transition against the current state and
//! returns the [`WorkflowAction`] to send. Nothing is mutated on failure.

use chrono::Utc;
use fxdesk_shared::types::UserId;
use rust_decimal::Decimal;

use crate::workflow::error::WorkflowError;
use crate::workflow::notes::{Note, NoteKind};
use crate::workflow::payment::{PaymentEntry, PaymentState, outstanding, paid_total};
use crate::workflow::types::{ReviewDecision, TransactionState, TransactionType, WorkflowAction};

/// Stateless service for transaction state transitions.
pub struct TransactionWorkflow;

/// A payment as entered by the cashier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInput {
    /// Amount paid now.
    pub amount: Decimal,
    /// Note for the trail.
    pub message: String,
}

impl TransactionWorkflow {
    /// Returns true if `from → to` is a legal transaction transition.
    #[must_use]
    pub fn is_valid_transition(from: TransactionState, to: TransactionState) -> bool {
        use TransactionState::{Cancelled, Paid, Pending, Rejected, Review};
        matches!(
            (from, to),
            (Review, Pending | Rejected | Cancelled | Review)
                | (Rejected, Review)
                | (Pending, Paid | Cancelled)
                | (Paid, Pending)
        )
    }

    /// Records a review decision.
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Review)` if the transaction is in Review
    /// * `Err(WorkflowError::InvalidTransition)` otherwise
    /// * `Err(WorkflowError::ReviewReasonRequired)` for a reject or cancel without notes
    pub fn review(
        current_state: TransactionState,
        decision: ReviewDecision,
        notes: &str,
        reviewed_by: UserId,
    ) -> Result<WorkflowAction, WorkflowError> {
        if current_state != TransactionState::Review {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                to: decision.target_state(),
            });
        }
        if decision.requires_reason() && notes.trim().is_empty() {
            return Err(WorkflowError::ReviewReasonRequired);
        }

        let reviewed_at = Utc::now();
        Ok(WorkflowAction::Review {
            new_state: decision.target_state(),
            decision,
            reviewed_by,
            reviewed_at,
            note: Note::at(NoteKind::Review, notes.trim(), reviewed_by, reviewed_at),
        })
    }

    /// Corrects the amount of a Review or Rejected transaction and sends it
    /// back to Review.
    pub fn edit(
        current_state: TransactionState,
        amount: Decimal,
    ) -> Result<WorkflowAction, WorkflowError> {
        if !current_state.is_editable() {
            return Err(WorkflowError::NotEditable(current_state));
        }
        ensure_positive(amount)?;
        Ok(WorkflowAction::Edit {
            new_state: TransactionState::Review,
            amount,
        })
    }

    /// Records a payment against a pending transaction.
    ///
    /// The transaction stays Pending until its live payments cover `amount`.
    ///
    /// # Returns
    /// * `Err(WorkflowError::InvalidTransition)` if not Pending
    /// * `Err(WorkflowError::NotPayable)` for INTERNAL transactions
    /// * `Err(WorkflowError::Overpayment)` if the payment exceeds what is owed
    pub fn pay(
        current_state: TransactionState,
        transaction_type: TransactionType,
        amount: Decimal,
        payments: &[PaymentEntry],
        payment: PaymentInput,
        paid_by: UserId,
    ) -> Result<WorkflowAction, WorkflowError> {
        if current_state != TransactionState::Pending {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                to: TransactionState::Paid,
            });
        }
        if !transaction_type.is_payable() {
            return Err(WorkflowError::NotPayable(transaction_type));
        }
        ensure_positive(payment.amount)?;

        let owed = outstanding(amount, payments);
        if payment.amount > owed {
            return Err(WorkflowError::Overpayment {
                amount: payment.amount,
                outstanding: owed,
            });
        }

        let total = paid_total(payments) + payment.amount;
        let new_state = if total >= amount {
            TransactionState::Paid
        } else {
            TransactionState::Pending
        };
        let paid_at = Utc::now();
        Ok(WorkflowAction::Pay {
            new_state,
            amount: payment.amount,
            paid_total: total,
            paid_by,
            paid_at,
            note: Note::at(NoteKind::Payment, payment.message, paid_by, paid_at),
        })
    }

    /// Cancels one payment.
    ///
    /// `others` are the transaction's remaining payments. The parent goes back
    /// to Pending only when none of them is still paid.
    pub fn cancel_payment(
        current_state: TransactionState,
        payment: &PaymentEntry,
        others: &[PaymentEntry],
        reason: &str,
        description: &str,
        cancelled_by: UserId,
    ) -> Result<WorkflowAction, WorkflowError> {
        if payment.state == PaymentState::Cancelled {
            return Err(WorkflowError::PaymentAlreadyCancelled);
        }
        if reason.trim().is_empty() || description.trim().is_empty() {
            return Err(WorkflowError::CancellationReasonRequired);
        }
        if !matches!(
            current_state,
            TransactionState::Pending | TransactionState::Paid
        ) {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                to: TransactionState::Pending,
            });
        }

        let new_state = if paid_total(others).is_zero() {
            TransactionState::Pending
        } else {
            current_state
        };
        let message = format!("{}: {}", reason.trim(), description.trim());
        Ok(WorkflowAction::CancelPayment {
            new_state,
            note: Note::new(NoteKind::Cancellation, message, cancelled_by),
        })
    }
}

pub(crate) fn ensure_positive(amount: Decimal) -> Result<(), WorkflowError> {
    if amount <= Decimal::ZERO {
        return Err(WorkflowError::InvalidAmount(amount));
    }
    Ok(())
}
