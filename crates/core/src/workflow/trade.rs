//! Wallet trade lifecycle.
//!
//! Trades share the transaction states. A pending trade is settled either by
//! a commit (booked against the wallet) or by a cash payment from the FUND
//! account; both require the wallet to cover the trade amount.

use chrono::{DateTime, Utc};
use fxdesk_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::trading::{TradeCommit, TradingType, WalletBalances, WalletEffect, WalletKind, fund_payment};
use crate::workflow::error::WorkflowError;
use crate::workflow::notes::{Note, NoteKind};
use crate::workflow::service::ensure_positive;
use crate::workflow::types::{ReviewDecision, Settlement, TransactionState};

/// What the lifecycle rules need to know about a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSnapshot {
    /// Current state.
    pub state: TransactionState,
    /// Trade kind.
    pub trading_type: TradingType,
    /// Amount in the wallet's trading currency.
    pub amount: Decimal,
    /// Office daily rate at creation.
    pub daily_rate: Decimal,
    /// Trade rate.
    pub trading_rate: Decimal,
}

/// Corrected trade figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCorrection {
    /// New amount.
    pub amount: Decimal,
    /// New trade rate.
    pub trading_rate: Decimal,
    /// New daily rate.
    pub daily_rate: Decimal,
}

/// Trade action representing a transition or a flag change.
#[derive(Debug, Clone)]
pub enum TradeAction {
    /// Reviewer decision with tags.
    Review {
        /// The new state.
        new_state: TransactionState,
        /// The decision taken.
        decision: ReviewDecision,
        /// The reviewer.
        reviewed_by: UserId,
        /// When the review happened.
        reviewed_at: DateTime<Utc>,
        /// REVIEW note carrying the tags.
        note: Note,
    },
    /// Figures corrected, back to Review.
    Edit {
        /// Always Review.
        new_state: TransactionState,
        /// The corrected figures.
        correction: TradeCorrection,
    },
    /// Pending trade settled.
    Settle {
        /// Always Paid.
        new_state: TransactionState,
        /// Commit or cash payment.
        settlement: Settlement,
        /// Cost and result figures.
        commit: TradeCommit,
        /// Movement of the wallet balances.
        effect: WalletEffect,
        /// Main-currency amount taken from the FUND account, for cash payments.
        fund_payment: Option<Decimal>,
        /// PAYMENT note, for cash payments.
        note: Option<Note>,
    },
    /// Pending or paid trade rolled back.
    Cancel {
        /// Always Cancelled.
        new_state: TransactionState,
        /// CANCELLATION note carrying the reason.
        note: Note,
    },
}

impl TradeAction {
    /// Returns the new state resulting from this action.
    #[must_use]
    pub fn new_state(&self) -> TransactionState {
        match self {
            Self::Review { new_state, .. }
            | Self::Edit { new_state, .. }
            | Self::Settle { new_state, .. }
            | Self::Cancel { new_state, .. } => *new_state,
        }
    }
}

/// Stateless service for trade transitions.
pub struct TradeWorkflow;

impl TradeWorkflow {
    /// Records a review decision. Reject and cancel need at least one tag.
    pub fn review(
        current_state: TransactionState,
        decision: ReviewDecision,
        tags: Vec<String>,
        reviewed_by: UserId,
    ) -> Result<TradeAction, WorkflowError> {
        if current_state != TransactionState::Review {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                to: decision.target_state(),
            });
        }
        let tags: Vec<String> = tags
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        if decision.requires_reason() && tags.is_empty() {
            return Err(WorkflowError::ReviewTagsRequired);
        }

        let reviewed_at = Utc::now();
        let note = Note::at(
            NoteKind::Review,
            decision.validation_state().as_str(),
            reviewed_by,
            reviewed_at,
        )
        .with_tags(tags);
        Ok(TradeAction::Review {
            new_state: decision.target_state(),
            decision,
            reviewed_by,
            reviewed_at,
            note,
        })
    }

    /// Corrects a Review or Rejected trade and sends it back to Review.
    pub fn edit(
        current_state: TransactionState,
        correction: TradeCorrection,
    ) -> Result<TradeAction, WorkflowError> {
        if !current_state.is_editable() {
            return Err(WorkflowError::NotEditable(current_state));
        }
        ensure_positive(correction.amount)?;
        ensure_positive(correction.trading_rate)?;
        ensure_positive(correction.daily_rate)?;
        Ok(TradeAction::Edit {
            new_state: TransactionState::Review,
            correction,
        })
    }

    /// Commits a pending trade against the wallet.
    pub fn commit(
        trade: &TradeSnapshot,
        wallet: &WalletBalances,
    ) -> Result<TradeAction, WorkflowError> {
        let commit = Self::settleable(trade, wallet)?;
        Ok(TradeAction::Settle {
            new_state: TransactionState::Paid,
            settlement: Settlement::Committed,
            commit,
            effect: commit.wallet_effect(),
            fund_payment: None,
            note: None,
        })
    }

    /// Pays a pending trade from the FUND account.
    pub fn pay(
        trade: &TradeSnapshot,
        wallet: &WalletBalances,
        wallet_kind: WalletKind,
        message: &str,
        paid_by: UserId,
    ) -> Result<TradeAction, WorkflowError> {
        let commit = Self::settleable(trade, wallet)?;
        let payment = fund_payment(
            trade.trading_type,
            wallet_kind,
            trade.amount,
            trade.trading_rate,
            trade.daily_rate,
        );
        Ok(TradeAction::Settle {
            new_state: TransactionState::Paid,
            settlement: Settlement::Paid,
            commit,
            effect: commit.wallet_effect(),
            fund_payment: Some(payment),
            note: Some(Note::new(NoteKind::Payment, message, paid_by)),
        })
    }

    /// Rolls back a pending or paid trade.
    pub fn cancel(
        current_state: TransactionState,
        reason: &str,
        cancelled_by: UserId,
    ) -> Result<TradeAction, WorkflowError> {
        if !matches!(
            current_state,
            TransactionState::Pending | TransactionState::Paid
        ) {
            return Err(WorkflowError::InvalidTransition {
                from: current_state,
                to: TransactionState::Cancelled,
            });
        }
        if reason.trim().is_empty() {
            return Err(WorkflowError::CancellationReasonRequired);
        }
        Ok(TradeAction::Cancel {
            new_state: TransactionState::Cancelled,
            note: Note::new(NoteKind::Cancellation, reason.trim(), cancelled_by),
        })
    }

    /// Validates a partner-paid flag change. The state is never touched.
    pub fn partner_paid(trading_type: TradingType, paid: bool) -> Result<bool, WorkflowError> {
        if !trading_type.is_sell() {
            return Err(WorkflowError::NotSellTrade(trading_type));
        }
        Ok(paid)
    }

    /// Whether an enable request must be sent. Tracking is never disabled.
    #[must_use]
    pub fn needs_balance_tracking_enable(currently_enabled: bool) -> bool {
        !currently_enabled
    }

    fn settleable(
        trade: &TradeSnapshot,
        wallet: &WalletBalances,
    ) -> Result<TradeCommit, WorkflowError> {
        if trade.state != TransactionState::Pending {
            return Err(WorkflowError::InvalidTransition {
                from: trade.state,
                to: TransactionState::Paid,
            });
        }
        if !wallet.covers(trade.amount) {
            return Err(WorkflowError::InsufficientBalance {
                amount: trade.amount,
                balance: wallet.trading_balance,
            });
        }
        Ok(TradeCommit::compute(
            wallet,
            trade.trading_type,
            trade.amount,
            trade.trading_rate,
        ))
    }
}
