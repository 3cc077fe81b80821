//! Cost basis and result of committing a pending trade.
//!
//! The cost is the trade's share of the wallet valuation:
//! `trading_cost = (value / trading_balance) * amount`. The result is what the
//! trade sold for minus that cost; a negative result is a loss.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::kind::TradingType;
use super::wallet::{WalletBalances, WalletKind};
use crate::conversion::guard::{markup_factor, safe_div, safe_mul};

/// Figures sent with a commit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCommit {
    /// Trade rate.
    pub trading_rate: Decimal,
    /// Trade amount in the wallet's trading currency.
    pub amount: Decimal,
    /// USD cost basis of the amount.
    pub trading_cost: Decimal,
    /// What the amount sold for.
    pub sold_amount: Decimal,
    /// Held-asset units backing the amount.
    pub crypto_amount: Decimal,
    /// `sold_amount - trading_cost`.
    pub trading_result: Decimal,
}

impl TradeCommit {
    /// Computes the commit figures against the wallet's current balances.
    #[must_use]
    pub fn compute(
        wallet: &WalletBalances,
        trading_type: TradingType,
        amount: Decimal,
        trading_rate: Decimal,
    ) -> Self {
        let trading_cost = safe_mul(wallet.cost_per_trading_unit(), amount);
        let sold_amount = match trading_type {
            TradingType::SimpleSell => safe_mul(amount, markup_factor(trading_rate)),
            _ => safe_div(amount, trading_rate),
        };
        Self {
            trading_rate,
            amount,
            trading_cost,
            sold_amount,
            crypto_amount: safe_mul(amount, wallet.crypto_per_trading_unit()),
            trading_result: sold_amount - trading_cost,
        }
    }

    /// True when the trade sold below the wallet's average cost.
    #[must_use]
    pub fn is_loss(&self) -> bool {
        self.trading_result.is_sign_negative() && !self.trading_result.is_zero()
    }

    /// Balance movement booked when the trade settles.
    #[must_use]
    pub fn wallet_effect(&self) -> WalletEffect {
        WalletEffect {
            trading_delta: -self.amount,
            crypto_delta: self.crypto_amount,
        }
    }
}

/// Signed change to a wallet's balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletEffect {
    /// Change of the trading balance.
    pub trading_delta: Decimal,
    /// Change of the crypto balance.
    pub crypto_delta: Decimal,
}

impl WalletEffect {
    /// Balances after the movement.
    #[must_use]
    pub fn apply_to(&self, wallet: WalletBalances) -> WalletBalances {
        WalletBalances {
            crypto_balance: wallet.crypto_balance + self.crypto_delta,
            trading_balance: wallet.trading_balance + self.trading_delta,
            value: wallet.value,
        }
    }
}

/// Main-currency amount paid out of the FUND account for a trade.
///
/// Deposits into a simple wallet carry a percentage markup; deposits into a
/// crypto wallet are paid at face value. Every other type converts through
/// `trading_rate / daily_rate`.
#[must_use]
pub fn fund_payment(
    trading_type: TradingType,
    wallet_kind: WalletKind,
    amount: Decimal,
    trading_rate: Decimal,
    daily_rate: Decimal,
) -> Decimal {
    match (trading_type, wallet_kind) {
        (TradingType::Deposit, WalletKind::Simple) => safe_mul(amount, markup_factor(trading_rate)),
        (TradingType::Deposit, WalletKind::Crypto) => amount,
        _ => safe_mul(amount, safe_div(trading_rate, daily_rate)),
    }
}
