//! Workflow error types for the transaction and trade lifecycle.

use fxdesk_shared::types::TransactionCode;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::trading::TradingType;
use crate::workflow::types::{TransactionState, TransactionType};

/// Errors that can occur during workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Attempted an invalid state transition.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        /// The current state.
        from: TransactionState,
        /// The attempted target state.
        to: TransactionState,
    },

    /// Only REVIEW and REJECTED records can be corrected.
    #[error("Cannot edit a record in state {0}")]
    NotEditable(TransactionState),

    /// The transaction type settles without a payment.
    #[error("Transactions of type {0} cannot be paid")]
    NotPayable(TransactionType),

    /// Amounts must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    /// A reject or cancel review without notes.
    #[error("A reason is required to reject or cancel")]
    ReviewReasonRequired,

    /// A trade reject or cancel review without tags.
    #[error("At least one tag is required to reject or cancel a trade")]
    ReviewTagsRequired,

    /// Cancelling a payment or a trade without a reason.
    #[error("Cancellation reason is required")]
    CancellationReasonRequired,

    /// The payment is larger than what is still owed.
    #[error("Payment {amount} exceeds outstanding amount {outstanding}")]
    Overpayment {
        /// Requested payment.
        amount: Decimal,
        /// Amount still owed.
        outstanding: Decimal,
    },

    /// The payment was already cancelled.
    #[error("Payment is already cancelled")]
    PaymentAlreadyCancelled,

    /// The wallet cannot cover the trade amount.
    #[error("Amount {amount} exceeds wallet trading balance {balance}")]
    InsufficientBalance {
        /// Amount required.
        amount: Decimal,
        /// Wallet trading balance.
        balance: Decimal,
    },

    /// Partner-paid tracking exists only for sell trades.
    #[error("Partner paid applies to SELL trades only, not {0}")]
    NotSellTrade(TradingType),

    /// Nothing was selected for a grouped commit.
    #[error("No trade selected")]
    EmptySelection,

    /// A selected trade is unknown or not pending.
    #[error("Trade {0} cannot be committed")]
    NotCommittable(TransactionCode),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::NotEditable(_)
            | Self::NotPayable(_)
            | Self::PaymentAlreadyCancelled
            | Self::NotSellTrade(_)
            | Self::NotCommittable(_) => 409,

            Self::InvalidAmount(_)
            | Self::ReviewReasonRequired
            | Self::ReviewTagsRequired
            | Self::CancellationReasonRequired
            | Self::EmptySelection => 400,

            Self::Overpayment { .. } | Self::InsufficientBalance { .. } => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotEditable(_) => "NOT_EDITABLE",
            Self::NotPayable(_) => "NOT_PAYABLE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::ReviewReasonRequired => "REVIEW_REASON_REQUIRED",
            Self::ReviewTagsRequired => "REVIEW_TAGS_REQUIRED",
            Self::CancellationReasonRequired => "CANCELLATION_REASON_REQUIRED",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::PaymentAlreadyCancelled => "PAYMENT_ALREADY_CANCELLED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::NotSellTrade(_) => "NOT_SELL_TRADE",
            Self::EmptySelection => "EMPTY_SELECTION",
            Self::NotCommittable(_) => "NOT_COMMITTABLE",
        }
    }
}
