//! Workflow domain types for the transaction and trade lifecycle.
//!
//! Transactions and trades share one state set. The valid transitions are:
//! - Review → Pending (approve)
//! - Review → Rejected (reject)
//! - Review → Cancelled (cancel)
//! - Review/Rejected → Review (edit and resubmit)
//! - Pending → Paid (pay, or commit for trades)
//! - Paid → Pending (every payment cancelled)
//! - Pending/Paid → Cancelled (trade rollback)

use chrono::{DateTime, Utc};
use fxdesk_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::notes::Note;

/// Lifecycle state of a transaction or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionState {
    /// Awaiting review.
    Review,
    /// Approved, awaiting payment or commit.
    Pending,
    /// Settled.
    Paid,
    /// Cancelled by a reviewer or an operator.
    Cancelled,
    /// Rejected by a reviewer; may be edited and resubmitted.
    Rejected,
}

impl TransactionState {
    /// Returns the wire representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "REVIEW",
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "REVIEW" => Some(Self::Review),
            "PENDING" => Some(Self::Pending),
            "PAID" => Some(Self::Paid),
            "CANCELLED" => Some(Self::Cancelled),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the amount may be corrected and resubmitted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Review | Self::Rejected)
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Transfer between two agent accounts.
    Internal,
    /// Payout to an outside customer.
    External,
    /// Cash deposit into an account.
    Deposit,
    /// Money sent through a payment method.
    Sending,
    /// Currency purchase through a provider.
    Forex,
}

impl TransactionType {
    /// Returns the wire representation of the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::External => "EXTERNAL",
            Self::Deposit => "DEPOSIT",
            Self::Sending => "SENDING",
            Self::Forex => "FOREX",
        }
    }

    /// INTERNAL transfers settle on approval; everything else is paid out.
    #[must_use]
    pub fn is_payable(&self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reviewer's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewDecision {
    /// Move to Pending.
    Approve,
    /// Move to Rejected.
    Reject,
    /// Move to Cancelled.
    Cancel,
}

impl ReviewDecision {
    /// State reached by this decision.
    #[must_use]
    pub fn target_state(&self) -> TransactionState {
        match self {
            Self::Approve => TransactionState::Pending,
            Self::Reject => TransactionState::Rejected,
            Self::Cancel => TransactionState::Cancelled,
        }
    }

    /// Value sent to the engine.
    #[must_use]
    pub fn validation_state(&self) -> ValidationState {
        match self {
            Self::Approve => ValidationState::Approved,
            Self::Reject => ValidationState::Rejected,
            Self::Cancel => ValidationState::Cancelled,
        }
    }

    /// Negative decisions must say why.
    #[must_use]
    pub fn requires_reason(&self) -> bool {
        !matches!(self, Self::Approve)
    }
}

/// Review outcome as the engine names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationState {
    /// Approved.
    Approved,
    /// Rejected.
    Rejected,
    /// Cancelled.
    Cancelled,
}

impl ValidationState {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// The decision this outcome records.
    #[must_use]
    pub fn decision(&self) -> ReviewDecision {
        match self {
            Self::Approved => ReviewDecision::Approve,
            Self::Rejected => ReviewDecision::Reject,
            Self::Cancelled => ReviewDecision::Cancel,
        }
    }
}

/// How a pending trade was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Settlement {
    /// Cost and result booked against the wallet.
    Committed,
    /// Paid in cash from the FUND account.
    Paid,
}

/// Workflow action representing a state transition with audit data.
///
/// The engine applies the change; the action carries what must be sent and
/// the note to append to the trail.
#[derive(Debug, Clone)]
pub enum WorkflowAction {
    /// Reviewer decision.
    Review {
        /// The new state.
        new_state: TransactionState,
        /// The decision taken.
        decision: ReviewDecision,
        /// The reviewer.
        reviewed_by: UserId,
        /// When the review happened.
        reviewed_at: DateTime<Utc>,
        /// REVIEW note.
        note: Note,
    },
    /// Amount correction and resubmission.
    Edit {
        /// Always Review.
        new_state: TransactionState,
        /// Corrected amount.
        amount: Decimal,
    },
    /// Payment recorded against a pending transaction.
    Pay {
        /// Pending while the payments do not cover the amount, then Paid.
        new_state: TransactionState,
        /// Amount of this payment.
        amount: Decimal,
        /// Total paid including this payment.
        paid_total: Decimal,
        /// The payer.
        paid_by: UserId,
        /// When the payment was made.
        paid_at: DateTime<Utc>,
        /// PAYMENT note.
        note: Note,
    },
    /// Cancellation of one payment.
    CancelPayment {
        /// Parent state after the cancellation.
        new_state: TransactionState,
        /// CANCELLATION note appended to the payment.
        note: Note,
    },
}

impl WorkflowAction {
    /// Returns the new state resulting from this action.
    #[must_use]
    pub fn new_state(&self) -> TransactionState {
        match self {
            Self::Review { new_state, .. }
            | Self::Edit { new_state, .. }
            | Self::Pay { new_state, .. }
            | Self::CancelPayment { new_state, .. } => *new_state,
        }
    }

    /// The note this action appends, if any.
    #[must_use]
    pub fn note(&self) -> Option<&Note> {
        match self {
            Self::Review { note, .. } | Self::Pay { note, .. } | Self::CancelPayment { note, .. } => {
                Some(note)
            }
            Self::Edit { .. } => None,
        }
    }
}
