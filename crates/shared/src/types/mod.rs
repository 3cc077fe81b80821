//! Common types used across the desk.

pub mod id;
pub mod money;
pub mod office;

pub use id::*;
pub use money::{AssetCode, CryptoCurrency, Currency, Money, format_amount};
pub use office::{OfficeCurrencies, OfficeCurrency, OfficeCurrencyError};
