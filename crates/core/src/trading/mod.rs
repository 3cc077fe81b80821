//! Wallet trading: balances, trade kinds, commit math and grouped selection.

pub mod commit;
pub mod kind;
pub mod selection;
pub mod wallet;

#[cfg(test)]
mod trading_props;

pub use commit::{TradeCommit, WalletEffect, fund_payment};
pub use kind::TradingType;
pub use selection::{Selection, TradeSummary, any_committable, auto_select, validate_selection};
pub use wallet::{WalletBalances, WalletKind};
