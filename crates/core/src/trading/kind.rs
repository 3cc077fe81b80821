//! Wallet trade types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of wallet trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingType {
    /// Office buys the wallet asset.
    #[serde(rename = "BUY")]
    Buy,
    /// Office sells from the wallet.
    #[serde(rename = "SELL")]
    Sell,
    /// Sell from a simple wallet at a percentage markup.
    #[serde(rename = "SIMPLE SELL")]
    SimpleSell,
    /// Exchange between two wallets.
    #[serde(rename = "EXCHANGE")]
    Exchange,
    /// Exchange into a simple wallet through a cross rate.
    #[serde(rename = "EXCHANGE WITH SIMPLE WALLET")]
    ExchangeWithSimpleWallet,
    /// Funds deposited into the wallet.
    #[serde(rename = "DEPOSIT")]
    Deposit,
}

impl TradingType {
    /// Every trading type.
    pub const ALL: [Self; 6] = [
        Self::Buy,
        Self::Sell,
        Self::SimpleSell,
        Self::Exchange,
        Self::ExchangeWithSimpleWallet,
        Self::Deposit,
    ];

    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::SimpleSell => "SIMPLE SELL",
            Self::Exchange => "EXCHANGE",
            Self::ExchangeWithSimpleWallet => "EXCHANGE WITH SIMPLE WALLET",
            Self::Deposit => "DEPOSIT",
        }
    }

    /// SELL and SIMPLE SELL.
    #[must_use]
    pub fn is_sell(&self) -> bool {
        matches!(self, Self::Sell | Self::SimpleSell)
    }
}

impl fmt::Display for TradingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
