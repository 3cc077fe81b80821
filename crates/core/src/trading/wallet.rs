//! Trading wallet balances and the rates they imply.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::conversion::guard::safe_div;

/// Kind of trading wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WalletKind {
    /// Holds a crypto asset; deposit rates are absolute.
    Crypto,
    /// Holds a fiat-like asset; deposit rates are percentage markups.
    Simple,
}

/// Balances of a trading wallet as last confirmed by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalances {
    /// Units of the held asset.
    pub crypto_balance: Decimal,
    /// Balance in the wallet's trading currency.
    pub trading_balance: Decimal,
    /// USD valuation of the wallet.
    pub value: Decimal,
}

impl WalletBalances {
    /// Creates a balance snapshot.
    #[must_use]
    pub const fn new(crypto_balance: Decimal, trading_balance: Decimal, value: Decimal) -> Self {
        Self {
            crypto_balance,
            trading_balance,
            value,
        }
    }

    /// Implied USD valuation of one unit of the held asset.
    #[must_use]
    pub fn unit_value(&self) -> Decimal {
        safe_div(self.value, self.crypto_balance)
    }

    /// Implied trading-currency units per USD of valuation.
    #[must_use]
    pub fn exchange_rate(&self) -> Decimal {
        safe_div(self.trading_balance, self.value)
    }

    /// USD cost basis of one unit of trading currency.
    #[must_use]
    pub fn cost_per_trading_unit(&self) -> Decimal {
        safe_div(self.value, self.trading_balance)
    }

    /// Held-asset units backing one unit of trading currency.
    #[must_use]
    pub fn crypto_per_trading_unit(&self) -> Decimal {
        safe_div(self.crypto_balance, self.trading_balance)
    }

    /// Whether `amount` of trading currency is covered by the balance.
    #[must_use]
    pub fn covers(&self, amount: Decimal) -> bool {
        amount <= self.trading_balance
    }
}
