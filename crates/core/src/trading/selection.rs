//! Grouped commit selection against one wallet's trading balance.

use chrono::{DateTime, Utc};
use fxdesk_shared::types::TransactionCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wallet::WalletBalances;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::TransactionState;

/// What the selection needs to know about a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSummary {
    /// Trade code.
    pub code: TransactionCode,
    /// Amount in the wallet's trading currency.
    pub amount: Decimal,
    /// Current state.
    pub state: TransactionState,
    /// Creation time; older trades are selected first.
    pub created_at: DateTime<Utc>,
}

impl TradeSummary {
    /// Pending and covered by the wallet on its own.
    #[must_use]
    pub fn is_committable(&self, wallet: &WalletBalances) -> bool {
        self.state == TransactionState::Pending && wallet.covers(self.amount)
    }
}

/// A set of trades chosen for one grouped commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Codes in commit order.
    pub codes: Vec<TransactionCode>,
    /// Sum of the selected amounts.
    pub total: Decimal,
}

impl Selection {
    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Submission is allowed only for a non-empty selection the wallet covers.
    #[must_use]
    pub fn can_submit(&self, wallet: &WalletBalances) -> bool {
        !self.is_empty() && wallet.covers(self.total)
    }
}

/// True if at least one trade could be committed on its own.
#[must_use]
pub fn any_committable(trades: &[TradeSummary], wallet: &WalletBalances) -> bool {
    trades.iter().any(|trade| trade.is_committable(wallet))
}

/// Default selection: pending trades oldest first, each taken while the
/// running total stays within the balance. Stops once the balance is used up.
#[must_use]
pub fn auto_select(trades: &[TradeSummary], wallet: &WalletBalances) -> Selection {
    let mut ordered: Vec<&TradeSummary> = trades.iter().collect();
    ordered.sort_by_key(|trade| trade.created_at);

    let mut selection = Selection::default();
    for trade in ordered {
        if trade.state == TransactionState::Pending
            && wallet.covers(selection.total + trade.amount)
        {
            selection.total += trade.amount;
            selection.codes.push(trade.code.clone());
        }
        if selection.total >= wallet.trading_balance {
            break;
        }
    }
    selection
}

/// Checks a hand-made selection before submission.
///
/// # Errors
///
/// - [`WorkflowError::EmptySelection`] when nothing is selected
/// - [`WorkflowError::NotCommittable`] for an unknown or non-pending code
/// - [`WorkflowError::InsufficientBalance`] when the sum exceeds the balance
pub fn validate_selection(
    trades: &[TradeSummary],
    codes: &[TransactionCode],
    wallet: &WalletBalances,
) -> Result<Selection, WorkflowError> {
    if codes.is_empty() {
        return Err(WorkflowError::EmptySelection);
    }

    let mut selection = Selection::default();
    for code in codes {
        if selection.codes.contains(code) {
            continue;
        }
        let trade = trades
            .iter()
            .find(|trade| &trade.code == code && trade.state == TransactionState::Pending)
            .ok_or_else(|| WorkflowError::NotCommittable(code.clone()))?;
        selection.total += trade.amount;
        selection.codes.push(code.clone());
    }

    if !wallet.covers(selection.total) {
        return Err(WorkflowError::InsufficientBalance {
            amount: selection.total,
            balance: wallet.trading_balance,
        });
    }
    Ok(selection)
}
