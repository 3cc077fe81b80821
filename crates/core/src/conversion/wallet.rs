//! Wallet trade quotes: buy, sell, exchange, simple-wallet exchange, deposit.
//!
//! `amount` is always denominated in the wallet's asset or trading currency.
//! `payment_in_main` and `payment_in_base` are what the counterparty pays.

use fxdesk_shared::types::AssetCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::guard::{markup_factor, safe_div, safe_mul};
use crate::trading::{WalletBalances, WalletKind};

/// Rate field edits shared by every wallet quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum WalletEdit {
    /// Office daily rate changed.
    DailyRate(Decimal),
    /// Trade rate changed.
    TradingRate(Decimal),
    /// Traded amount changed.
    Amount(Decimal),
}

/// Quote for a BUY trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyQuote {
    /// Main to base currency rate.
    pub daily_rate: Decimal,
    /// Asset to trading-currency rate.
    pub trading_rate: Decimal,
    /// Amount in the wallet asset.
    pub amount: Decimal,
    /// `amount * (trading_rate / daily_rate)`.
    pub payment_in_main: Decimal,
    /// `amount * trading_rate`.
    pub payment_in_base: Decimal,
}

impl BuyQuote {
    /// Creates an empty quote.
    #[must_use]
    pub fn new(daily_rate: Decimal, trading_rate: Decimal) -> Self {
        Self {
            daily_rate,
            trading_rate,
            ..Self::default()
        }
    }

    /// Applies one edit and recomputes both payments.
    #[must_use]
    pub fn apply(mut self, edit: WalletEdit) -> Self {
        match edit {
            WalletEdit::DailyRate(rate) => self.daily_rate = rate,
            WalletEdit::TradingRate(rate) => self.trading_rate = rate,
            WalletEdit::Amount(amount) => self.amount = amount,
        }
        self.payment_in_main = safe_mul(self.amount, safe_div(self.trading_rate, self.daily_rate));
        self.payment_in_base = safe_mul(self.amount, self.trading_rate);
        self
    }
}

/// Quote for a two-wallet EXCHANGE trade.
///
/// Same payments as a buy. The optional `exchange_rate` to the destination
/// wallet only produces an informational amount for reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    /// Payments, computed like a buy.
    #[serde(flatten)]
    pub legs: BuyQuote,
    /// Rate to the destination wallet, if entered.
    pub exchange_rate: Option<Decimal>,
}

impl ExchangeQuote {
    /// Creates an empty quote.
    #[must_use]
    pub fn new(daily_rate: Decimal, trading_rate: Decimal) -> Self {
        Self {
            legs: BuyQuote::new(daily_rate, trading_rate),
            exchange_rate: None,
        }
    }

    /// Applies one edit.
    #[must_use]
    pub fn apply(mut self, edit: WalletEdit) -> Self {
        self.legs = self.legs.apply(edit);
        self
    }

    /// Sets or clears the destination exchange rate.
    #[must_use]
    pub fn with_exchange_rate(mut self, rate: Option<Decimal>) -> Self {
        self.exchange_rate = rate.filter(|r| !r.is_zero());
        self
    }

    /// Amount expected in the destination wallet. Read-only.
    #[must_use]
    pub fn exchanged_amount(&self) -> Option<Decimal> {
        self.exchange_rate.map(|rate| safe_mul(self.legs.amount, rate))
    }
}

/// Quote for a SELL or SIMPLE SELL trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellQuote {
    /// The wallet's trading currency.
    pub trading_currency: AssetCode,
    /// The currency the customer is sold.
    pub selling_currency: AssetCode,
    /// Main to base currency rate.
    pub daily_rate: Decimal,
    /// Trade rate.
    pub trading_rate: Decimal,
    /// Amount sold.
    pub amount: Decimal,
    /// Payment in main currency.
    pub payment_in_main: Decimal,
    /// `payment_in_main * daily_rate`.
    pub payment_in_base: Decimal,
}

impl SellQuote {
    /// Creates an empty quote.
    #[must_use]
    pub fn new(trading_currency: AssetCode, selling_currency: AssetCode, daily_rate: Decimal) -> Self {
        Self {
            trading_currency,
            selling_currency,
            daily_rate,
            trading_rate: Decimal::ZERO,
            amount: Decimal::ZERO,
            payment_in_main: Decimal::ZERO,
            payment_in_base: Decimal::ZERO,
        }
    }

    /// Applies one edit and recomputes both payments.
    #[must_use]
    pub fn apply(mut self, edit: WalletEdit) -> Self {
        match edit {
            WalletEdit::DailyRate(rate) => self.daily_rate = rate,
            WalletEdit::TradingRate(rate) => self.trading_rate = rate,
            WalletEdit::Amount(amount) => self.amount = amount,
        }
        self.recompute();
        self
    }

    /// Changes the currency sold to the customer.
    #[must_use]
    pub fn selling(mut self, currency: AssetCode) -> Self {
        self.selling_currency = currency;
        self.recompute();
        self
    }

    /// Selling the wallet's own trading currency divides by the rate.
    #[must_use]
    pub fn sells_trading_currency(&self) -> bool {
        self.selling_currency == self.trading_currency
    }

    fn recompute(&mut self) {
        self.payment_in_main = if self.sells_trading_currency() {
            safe_div(self.amount, self.trading_rate)
        } else {
            safe_mul(self.amount, safe_div(self.trading_rate, self.daily_rate))
        };
        self.payment_in_base = safe_mul(self.payment_in_main, self.daily_rate);
    }
}

/// Quote for an EXCHANGE WITH SIMPLE WALLET trade.
///
/// Three amounts stay consistent whichever one is edited:
/// - `amount` in the source asset
/// - `payment_in_main` in the exchange currency (`amount * exchange_rate`)
/// - `payment_in_base` in the destination trading currency
///   (`amount * exchange_rate / trading_rate`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleExchangeQuote {
    /// Main to base currency rate.
    pub daily_rate: Decimal,
    /// Rate charged to the customer, used for the benefit.
    pub selling_rate: Decimal,
    /// Source asset to exchange currency rate.
    pub exchange_rate: Decimal,
    /// Destination trading currency to exchange currency rate.
    pub trading_rate: Decimal,
    /// Amount in the source asset.
    pub amount: Decimal,
    /// Amount in the exchange currency.
    pub payment_in_main: Decimal,
    /// Amount in the destination trading currency.
    pub payment_in_base: Decimal,
}

/// The simple-exchange field the user edited last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SimpleExchangeEdit {
    /// Daily rate changed.
    DailyRate(Decimal),
    /// Selling rate changed.
    SellingRate(Decimal),
    /// Source to exchange currency rate changed.
    ExchangeRate(Decimal),
    /// Destination trading rate changed.
    TradingRate(Decimal),
    /// Source amount changed.
    Amount(Decimal),
    /// Exchange-currency amount changed.
    PaymentInMain(Decimal),
    /// Destination amount changed.
    PaymentInBase(Decimal),
}

impl SimpleExchangeQuote {
    /// Creates an empty quote.
    #[must_use]
    pub fn new(daily_rate: Decimal) -> Self {
        Self {
            daily_rate,
            ..Self::default()
        }
    }

    /// Applies one edit. Rate edits keep `amount` and re-derive the payments.
    #[must_use]
    pub fn apply(mut self, edit: SimpleExchangeEdit) -> Self {
        match edit {
            SimpleExchangeEdit::DailyRate(rate) => self.daily_rate = rate,
            SimpleExchangeEdit::SellingRate(rate) => self.selling_rate = rate,
            SimpleExchangeEdit::ExchangeRate(rate) => {
                self.exchange_rate = rate;
                self.payments_from_amount();
            }
            SimpleExchangeEdit::TradingRate(rate) => {
                self.trading_rate = rate;
                self.payments_from_amount();
            }
            SimpleExchangeEdit::Amount(amount) => {
                self.amount = amount;
                self.payments_from_amount();
            }
            SimpleExchangeEdit::PaymentInMain(main) => {
                self.payment_in_main = main;
                self.amount = safe_div(main, self.exchange_rate);
                self.payment_in_base = safe_div(main, self.trading_rate);
            }
            SimpleExchangeEdit::PaymentInBase(base) => {
                self.payment_in_base = base;
                self.payment_in_main = safe_mul(base, self.trading_rate);
                self.amount = safe_div(self.payment_in_main, self.exchange_rate);
            }
        }
        self
    }

    /// Benefit for review: sale value at the selling rate minus the source
    /// wallet's cost of the amount.
    #[must_use]
    pub fn benefit(&self, source: &WalletBalances) -> Decimal {
        safe_mul(self.amount, safe_div(self.selling_rate, self.daily_rate))
            - safe_mul(self.amount, source.unit_value())
    }

    fn payments_from_amount(&mut self) {
        self.payment_in_main = safe_mul(self.amount, self.exchange_rate);
        self.payment_in_base = safe_mul(self.amount, safe_div(self.exchange_rate, self.trading_rate));
    }
}

/// Quote for a DEPOSIT into a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositQuote {
    /// Kind of the receiving wallet; decides how `rate` is read.
    pub wallet_kind: WalletKind,
    /// Main to base currency rate.
    pub daily_rate: Decimal,
    /// Absolute rate (crypto wallet) or percentage markup (simple wallet).
    pub rate: Decimal,
    /// Deposited amount.
    pub amount: Decimal,
    /// Payment in main currency.
    pub payment_in_main: Decimal,
    /// `daily_rate * payment_in_main`.
    pub payment_in_base: Decimal,
}

impl DepositQuote {
    /// Creates an empty quote.
    #[must_use]
    pub fn new(wallet_kind: WalletKind, daily_rate: Decimal) -> Self {
        Self {
            wallet_kind,
            daily_rate,
            rate: Decimal::ZERO,
            amount: Decimal::ZERO,
            payment_in_main: Decimal::ZERO,
            payment_in_base: Decimal::ZERO,
        }
    }

    /// Applies one edit. `TradingRate` sets the deposit rate.
    #[must_use]
    pub fn apply(mut self, edit: WalletEdit) -> Self {
        match edit {
            WalletEdit::DailyRate(rate) => self.daily_rate = rate,
            WalletEdit::TradingRate(rate) => self.rate = rate,
            WalletEdit::Amount(amount) => self.amount = amount,
        }
        self.payment_in_main = match self.wallet_kind {
            WalletKind::Simple => safe_mul(self.amount, markup_factor(self.rate)),
            WalletKind::Crypto => safe_mul(self.amount, self.rate),
        };
        self.payment_in_base = safe_mul(self.daily_rate, self.payment_in_main);
        self
    }
}
