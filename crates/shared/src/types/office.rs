//! Per-office currency configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::Currency;

/// A currency configured for an office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeCurrency {
    /// The currency.
    pub name: Currency,
    /// Posted daily rate: how much base currency one unit of main currency buys.
    #[serde(rename = "defaultRate")]
    pub default_rate: Decimal,
    /// Primary operating currency for customer-facing amounts.
    #[serde(default)]
    pub main: bool,
    /// Settlement/reference currency.
    #[serde(default)]
    pub base: bool,
}

/// Errors raised while validating an office currency set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OfficeCurrencyError {
    /// No currency or more than one currency is flagged `main`.
    #[error("Office must have exactly one main currency, found {0}")]
    MainCount(usize),
    /// No currency or more than one currency is flagged `base`.
    #[error("Office must have exactly one base currency, found {0}")]
    BaseCount(usize),
}

/// Validated set of office currencies.
///
/// Invariant: exactly one entry is `main` and exactly one is `base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OfficeCurrencies {
    entries: Vec<OfficeCurrency>,
    #[serde(skip)]
    main: usize,
    #[serde(skip)]
    base: usize,
}

impl OfficeCurrencies {
    /// Validates and wraps the configured currencies.
    pub fn new(entries: Vec<OfficeCurrency>) -> Result<Self, OfficeCurrencyError> {
        let main = single(&entries, |c| c.main).map_err(OfficeCurrencyError::MainCount)?;
        let base = single(&entries, |c| c.base).map_err(OfficeCurrencyError::BaseCount)?;
        Ok(Self {
            entries,
            main,
            base,
        })
    }

    /// The office's main currency entry.
    #[must_use]
    pub fn main(&self) -> &OfficeCurrency {
        &self.entries[self.main]
    }

    /// The office's base currency entry.
    #[must_use]
    pub fn base(&self) -> &OfficeCurrency {
        &self.entries[self.base]
    }

    /// Daily rate between main and base currency.
    #[must_use]
    pub fn daily_rate(&self) -> Decimal {
        self.main().default_rate
    }

    /// Looks up a configured currency.
    #[must_use]
    pub fn get(&self, currency: Currency) -> Option<&OfficeCurrency> {
        self.entries.iter().find(|c| c.name == currency)
    }

    /// All configured entries.
    #[must_use]
    pub fn entries(&self) -> &[OfficeCurrency] {
        &self.entries
    }
}

/// Index of the only entry matching `flagged`, or how many matched.
fn single(
    entries: &[OfficeCurrency],
    flagged: impl Fn(&OfficeCurrency) -> bool,
) -> Result<usize, usize> {
    let found: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, c)| flagged(c))
        .map(|(index, _)| index)
        .collect();
    match found.as_slice() {
        [index] => Ok(*index),
        _ => Err(found.len()),
    }
}

impl<'de> Deserialize<'de> for OfficeCurrencies {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<OfficeCurrency>::deserialize(deserializer)?;
        Self::new(entries).map_err(serde::de::Error::custom)
    }
}
