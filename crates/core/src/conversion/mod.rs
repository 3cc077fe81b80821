//! Rate/amount converter.
//!
//! One quote type per transaction or trade shape. Each quote is a value that
//! takes one edit at a time through `apply` and recomputes every dependent
//! field from the field that was edited. The quotes are advisory: the
//! accounting engine's response is authoritative.
//!
//! # Modules
//!
//! - `guard` - Zero-safe division and percentage helpers
//! - `transfer` - INTERNAL, DEPOSIT, SENDING and EXTERNAL transactions
//! - `forex` - BANKTT and provider-quoted forex transactions
//! - `wallet` - Wallet trades
//! - `quote` - Tagged quote requests for batch evaluation

pub mod error;
pub mod forex;
pub mod guard;
pub mod quote;
pub mod transfer;
pub mod wallet;

#[cfg(test)]
mod conversion_props;

pub use error::ConversionError;
pub use forex::{BankTtEdit, BankTtQuote, ForexEdit, ForexQuote};
pub use guard::{markup_factor, percent_of, round_display, safe_div, safe_mul};
pub use quote::{FieldEdit, QuoteRequest, QuoteSummary};
pub use transfer::{TransferEdit, TransferQuote};
pub use wallet::{
    BuyQuote, DepositQuote, ExchangeQuote, SellQuote, SimpleExchangeEdit, SimpleExchangeQuote,
    WalletEdit,
};
