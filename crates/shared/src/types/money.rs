//! Currency codes and money display.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` end to end.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fiat currencies an office can operate in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// UAE Dirham
    Aed,
    /// West African CFA franc
    Cfa,
    /// Guinean franc
    Gnf,
    /// Chinese yuan
    Rmb,
}

/// Crypto assets a trading wallet can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CryptoCurrency {
    /// Bitcoin
    Btc,
    /// Ether
    Eth,
    /// Tether
    Usdt,
}

/// Either a fiat or a crypto code.
///
/// Serialized as the bare code (`"USD"`, `"BTC"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetCode {
    /// Fiat currency.
    Fiat(Currency),
    /// Crypto currency.
    Crypto(CryptoCurrency),
}

impl Currency {
    /// All supported fiat currencies.
    pub const ALL: [Self; 6] = [
        Self::Usd,
        Self::Eur,
        Self::Aed,
        Self::Cfa,
        Self::Gnf,
        Self::Rmb,
    ];

    /// Returns the ISO-like code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Aed => "AED",
            Self::Cfa => "CFA",
            Self::Gnf => "GNF",
            Self::Rmb => "RMB",
        }
    }

    /// Prefix placed before a formatted amount.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Aed => "AED ",
            Self::Cfa => "CFA ",
            Self::Gnf => "GNF ",
            Self::Rmb => "¥",
        }
    }

    /// Icon name used by the dashboard for this currency.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Usd => "currency-dollar",
            Self::Eur => "currency-euro",
            Self::Aed => "currency-dirham",
            Self::Cfa => "currency",
            Self::Gnf => "currency-cent",
            Self::Rmb => "currency-yen",
        }
    }
}

impl CryptoCurrency {
    /// Returns the ticker code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Usdt => "USDT",
        }
    }

    /// Prefix placed before a formatted amount.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Btc => "₿",
            Self::Eth => "Ξ",
            Self::Usdt => "₮",
        }
    }

    /// Icon name used by the dashboard for this asset.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Btc => "currency-bitcoin",
            Self::Eth => "currency-ethereum",
            Self::Usdt => "currency-dollar",
        }
    }
}

impl AssetCode {
    /// Returns the code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Fiat(c) => c.code(),
            Self::Crypto(c) => c.code(),
        }
    }

    /// Prefix placed before a formatted amount.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Fiat(c) => c.prefix(),
            Self::Crypto(c) => c.prefix(),
        }
    }

    /// Icon name used by the dashboard.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Fiat(c) => c.icon(),
            Self::Crypto(c) => c.icon(),
        }
    }
}

impl From<Currency> for AssetCode {
    fn from(value: Currency) -> Self {
        Self::Fiat(value)
    }
}

impl From<CryptoCurrency> for AssetCode {
    fn from(value: CryptoCurrency) -> Self {
        Self::Crypto(value)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::fmt::Display for CryptoCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::fmt::Display for AssetCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "AED" => Ok(Self::Aed),
            "CFA" => Ok(Self::Cfa),
            "GNF" => Ok(Self::Gnf),
            "RMB" => Ok(Self::Rmb),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

impl std::str::FromStr for CryptoCurrency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BTC" => Ok(Self::Btc),
            "ETH" => Ok(Self::Eth),
            "USDT" => Ok(Self::Usdt),
            _ => Err(format!("Unknown crypto currency: {s}")),
        }
    }
}

impl std::str::FromStr for AssetCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Currency>()
            .map(Self::Fiat)
            .or_else(|_| s.parse::<CryptoCurrency>().map(Self::Crypto))
            .map_err(|_| format!("Unknown asset: {s}"))
    }
}

/// An amount tagged with the asset it is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount.
    pub amount: Decimal,
    /// The asset the amount is denominated in.
    pub asset: AssetCode,
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub fn new(amount: Decimal, asset: impl Into<AssetCode>) -> Self {
        Self {
            amount,
            asset: asset.into(),
        }
    }

    /// Creates a zero amount in the specified asset.
    #[must_use]
    pub fn zero(asset: impl Into<AssetCode>) -> Self {
        Self::new(Decimal::ZERO, asset)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Formats the amount with its prefix, e.g. `$1,234.50`.
    #[must_use]
    pub fn display(&self, decimal_places: u32) -> String {
        format!(
            "{}{}",
            self.asset.prefix(),
            format_amount(self.amount, decimal_places)
        )
    }
}

/// Formats an amount with thousands separators and a fixed number of decimals.
///
/// Rounds with banker's rounding first, so `format_amount(dec!(2.345), 2)` is
/// `"2.34"`.
#[must_use]
pub fn format_amount(value: Decimal, decimal_places: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);
    let precision = decimal_places as usize;
    let text = format!("{:.precision$}", rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let money = Money::new(dec!(100.00), Currency::Usd);
        assert_eq!(money.amount, dec!(100.00));
        assert_eq!(money.asset, AssetCode::Fiat(Currency::Usd));
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(CryptoCurrency::Btc);
        assert!(money.is_zero());
        assert!(!money.is_negative());
        assert_eq!(money.asset, AssetCode::Crypto(CryptoCurrency::Btc));
    }

    #[test]
    fn test_money_is_negative() {
        assert!(Money::new(dec!(-10), Currency::Aed).is_negative());
        assert!(!Money::new(dec!(10), Currency::Aed).is_negative());
    }

    #[rstest]
    #[case(Currency::Usd, "USD", "$")]
    #[case(Currency::Eur, "EUR", "€")]
    #[case(Currency::Aed, "AED", "AED ")]
    #[case(Currency::Cfa, "CFA", "CFA ")]
    #[case(Currency::Gnf, "GNF", "GNF ")]
    #[case(Currency::Rmb, "RMB", "¥")]
    fn test_currency_code_and_prefix(
        #[case] currency: Currency,
        #[case] code: &str,
        #[case] prefix: &str,
    ) {
        assert_eq!(currency.to_string(), code);
        assert_eq!(currency.prefix(), prefix);
        assert_eq!(Currency::from_str(code).unwrap(), currency);
    }

    #[rstest]
    #[case(CryptoCurrency::Btc, "BTC", "₿")]
    #[case(CryptoCurrency::Eth, "ETH", "Ξ")]
    #[case(CryptoCurrency::Usdt, "USDT", "₮")]
    fn test_crypto_code_and_prefix(
        #[case] crypto: CryptoCurrency,
        #[case] code: &str,
        #[case] prefix: &str,
    ) {
        assert_eq!(crypto.to_string(), code);
        assert_eq!(crypto.prefix(), prefix);
        assert_eq!(CryptoCurrency::from_str(code).unwrap(), crypto);
    }

    #[test]
    fn test_currency_from_str_is_case_insensitive() {
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_asset_code_parse() {
        assert_eq!(
            AssetCode::from_str("aed").unwrap(),
            AssetCode::Fiat(Currency::Aed)
        );
        assert_eq!(
            AssetCode::from_str("USDT").unwrap(),
            AssetCode::Crypto(CryptoCurrency::Usdt)
        );
        assert!(AssetCode::from_str("NA").is_err());
    }

    #[test]
    fn test_asset_code_serde_is_bare_code() {
        let json = serde_json::to_string(&AssetCode::Crypto(CryptoCurrency::Eth)).unwrap();
        assert_eq!(json, "\"ETH\"");
        let back: AssetCode = serde_json::from_str("\"RMB\"").unwrap();
        assert_eq!(back, AssetCode::Fiat(Currency::Rmb));
    }

    #[rstest]
    #[case(dec!(0), 2, "0.00")]
    #[case(dec!(367), 2, "367.00")]
    #[case(dec!(1234567.891), 2, "1,234,567.89")]
    #[case(dec!(-1234.5), 2, "-1,234.50")]
    #[case(dec!(2.345), 2, "2.34")]
    #[case(dec!(999999), 0, "999,999")]
    #[case(dec!(1000), 3, "1,000.000")]
    fn test_format_amount(#[case] value: Decimal, #[case] dp: u32, #[case] expected: &str) {
        assert_eq!(format_amount(value, dp), expected);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(dec!(3743.4), Currency::Aed).display(2), "AED 3,743.40");
        assert_eq!(
            Money::new(dec!(0.125), CryptoCurrency::Btc).display(3),
            "₿0.125"
        );
    }
}
