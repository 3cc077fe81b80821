//! Tagged quote requests evaluated into named, display-ready fields.

use fxdesk_shared::types::AssetCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ConversionError;
use super::forex::{BankTtEdit, BankTtQuote, ForexEdit, ForexQuote};
use super::guard::round_display;
use super::transfer::{TransferEdit, TransferQuote};
use super::wallet::{
    BuyQuote, DepositQuote, ExchangeQuote, SellQuote, SimpleExchangeEdit, SimpleExchangeQuote,
    WalletEdit,
};
use crate::trading::{WalletBalances, WalletKind};

/// An edit naming the field it changes.
pub trait FieldEdit {
    /// Field name, as serialized.
    fn field(&self) -> &'static str;
    /// The new value.
    fn value(&self) -> Decimal;
}

macro_rules! field_edit {
    ($edit:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl FieldEdit for $edit {
            fn field(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $name),+
                }
            }

            fn value(&self) -> Decimal {
                match self {
                    $(Self::$variant(value))|+ => *value,
                }
            }
        }
    };
}

field_edit!(TransferEdit {
    Rate => "rate",
    Amount => "amount",
    ConvertedAmount => "converted_amount",
    ChargePercentage => "charge_percentage",
    Charges => "charges",
});

field_edit!(BankTtEdit {
    DailyRate => "daily_rate",
    BankRate => "bank_rate",
    BankFees => "bank_fees",
    SellingRate => "selling_rate",
    Amount => "amount",
    AmountInBase => "amount_in_base",
    AmountInMain => "amount_in_main",
});

field_edit!(ForexEdit {
    DailyRate => "daily_rate",
    IntermediateBuyingRate => "intermediate_buying_rate",
    BuyingRate => "buying_rate",
    SellingRate => "selling_rate",
    Amount => "amount",
    AmountInBase => "amount_in_base",
    AmountInMain => "amount_in_main",
});

field_edit!(WalletEdit {
    DailyRate => "daily_rate",
    TradingRate => "trading_rate",
    Amount => "amount",
});

field_edit!(SimpleExchangeEdit {
    DailyRate => "daily_rate",
    SellingRate => "selling_rate",
    ExchangeRate => "exchange_rate",
    TradingRate => "trading_rate",
    Amount => "amount",
    PaymentInMain => "payment_in_main",
    PaymentInBase => "payment_in_base",
});

/// A quote to evaluate: one shape, its fixed inputs, and the edits in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum QuoteRequest {
    /// INTERNAL, DEPOSIT, SENDING and EXTERNAL transactions.
    Transfer {
        /// Conversion rate.
        rate: Decimal,
        /// Edits in the order they were made.
        edits: Vec<TransferEdit>,
    },
    /// BANKTT forex transaction.
    BankTt {
        /// Office daily rate.
        daily_rate: Decimal,
        /// Edits in the order they were made.
        edits: Vec<BankTtEdit>,
    },
    /// ALI PAY and TT RMB forex transactions.
    Forex {
        /// Office daily rate.
        daily_rate: Decimal,
        /// Edits in the order they were made.
        edits: Vec<ForexEdit>,
    },
    /// Wallet BUY.
    Buy {
        /// Office daily rate.
        daily_rate: Decimal,
        /// Edits in the order they were made.
        edits: Vec<WalletEdit>,
    },
    /// Wallet SELL and SIMPLE SELL.
    Sell {
        /// Wallet trading currency.
        trading_currency: AssetCode,
        /// Currency sold to the customer.
        selling_currency: AssetCode,
        /// Office daily rate.
        daily_rate: Decimal,
        /// Edits in the order they were made.
        edits: Vec<WalletEdit>,
    },
    /// Two-wallet EXCHANGE.
    Exchange {
        /// Office daily rate.
        daily_rate: Decimal,
        /// Rate to the destination wallet, if any.
        #[serde(default)]
        exchange_rate: Option<Decimal>,
        /// Edits in the order they were made.
        edits: Vec<WalletEdit>,
    },
    /// EXCHANGE WITH SIMPLE WALLET.
    SimpleExchange {
        /// Office daily rate.
        daily_rate: Decimal,
        /// Source wallet balances, for the benefit.
        #[serde(default)]
        wallet: Option<WalletBalances>,
        /// Edits in the order they were made.
        edits: Vec<SimpleExchangeEdit>,
    },
    /// Wallet DEPOSIT.
    Deposit {
        /// Receiving wallet kind.
        wallet_kind: WalletKind,
        /// Office daily rate.
        daily_rate: Decimal,
        /// Edits in the order they were made.
        edits: Vec<WalletEdit>,
    },
}

/// Evaluated quote fields, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuoteSummary {
    /// `(field, value)` pairs.
    pub fields: Vec<(&'static str, Decimal)>,
}

impl QuoteSummary {
    fn push(&mut self, field: &'static str, value: Decimal) {
        self.fields.push((field, value));
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<Decimal> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| *value)
    }

    /// Copy with every value rounded for display.
    #[must_use]
    pub fn rounded(&self, decimal_places: u32) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .map(|(name, value)| (*name, round_display(*value, decimal_places)))
                .collect(),
        }
    }
}

/// Largest rate or amount a quote accepts.
const MAX_INPUT: i64 = 1_000_000_000_000_000;

fn check<E: FieldEdit>(edits: &[E]) -> Result<(), ConversionError> {
    if edits.is_empty() {
        return Err(ConversionError::NoEdits);
    }
    edits.iter().try_for_each(|edit| in_range(edit.field(), edit.value()))
}

fn in_range(field: &'static str, value: Decimal) -> Result<(), ConversionError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ConversionError::NegativeInput { field, value });
    }
    let max = Decimal::from(MAX_INPUT);
    if value > max {
        return Err(ConversionError::OutOfRange { field, value, max });
    }
    Ok(())
}

impl QuoteRequest {
    /// Replays the edits and returns every computed field.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] when there are no edits or an input is
    /// negative or too large.
    pub fn evaluate(&self) -> Result<QuoteSummary, ConversionError> {
        let mut out = QuoteSummary::default();
        match self {
            Self::Transfer { rate, edits } => {
                in_range("rate", *rate)?;
                check(edits)?;
                let q = edits
                    .iter()
                    .fold(TransferQuote::new(*rate), |q, e| q.apply(*e));
                out.push("rate", q.rate);
                out.push("amount", q.amount);
                out.push("converted_amount", q.converted_amount);
                out.push("charge_percentage", q.charge_percentage);
                out.push("charges", q.charges);
                out.push("converted_charges", q.converted_charges());
            }
            Self::BankTt { daily_rate, edits } => {
                in_range("daily_rate", *daily_rate)?;
                check(edits)?;
                let q = edits
                    .iter()
                    .fold(BankTtQuote::new(*daily_rate), |q, e| q.apply(*e));
                out.push("amount", q.amount);
                out.push("amount_in_main", q.amount_in_main);
                out.push("amount_in_base", q.amount_in_base);
                out.push("bank_amount_in_base", q.bank_amount_in_base);
                out.push("bank_amount_in_main", q.bank_amount_in_main);
                out.push("benefit_in_main", q.benefit_in_main());
                out.push("benefit_in_base", q.benefit_in_base());
            }
            Self::Forex { daily_rate, edits } => {
                in_range("daily_rate", *daily_rate)?;
                check(edits)?;
                let q = edits
                    .iter()
                    .fold(ForexQuote::new(*daily_rate), |q, e| q.apply(*e));
                out.push("buying_rate", q.buying_rate);
                out.push("intermediate_buying_rate", q.intermediate_buying_rate);
                out.push("selling_rate", q.selling_rate);
                out.push("intermediate_selling_rate", q.intermediate_selling_rate);
                out.push("amount", q.amount);
                out.push("amount_in_main", q.amount_in_main);
                out.push("amount_in_base", q.amount_in_base);
                out.push("provider_payment", q.provider_payment());
                out.push("benefit_in_main", q.benefit_in_main());
            }
            Self::Buy { daily_rate, edits } => {
                in_range("daily_rate", *daily_rate)?;
                check(edits)?;
                let q = edits
                    .iter()
                    .fold(BuyQuote::new(*daily_rate, Decimal::ZERO), |q, e| q.apply(*e));
                push_payments(&mut out, q.amount, q.payment_in_main, q.payment_in_base);
            }
            Self::Sell {
                trading_currency,
                selling_currency,
                daily_rate,
                edits,
            } => {
                in_range("daily_rate", *daily_rate)?;
                check(edits)?;
                let start = SellQuote::new(*trading_currency, *selling_currency, *daily_rate);
                let q = edits.iter().fold(start, |q, e| q.apply(*e));
                push_payments(&mut out, q.amount, q.payment_in_main, q.payment_in_base);
            }
            Self::Exchange {
                daily_rate,
                exchange_rate,
                edits,
            } => {
                in_range("daily_rate", *daily_rate)?;
                if let Some(rate) = exchange_rate {
                    in_range("exchange_rate", *rate)?;
                }
                check(edits)?;
                let q = edits
                    .iter()
                    .fold(ExchangeQuote::new(*daily_rate, Decimal::ZERO), |q, e| {
                        q.apply(*e)
                    })
                    .with_exchange_rate(*exchange_rate);
                push_payments(
                    &mut out,
                    q.legs.amount,
                    q.legs.payment_in_main,
                    q.legs.payment_in_base,
                );
                if let Some(exchanged) = q.exchanged_amount() {
                    out.push("exchanged_amount", exchanged);
                }
            }
            Self::SimpleExchange {
                daily_rate,
                wallet,
                edits,
            } => {
                in_range("daily_rate", *daily_rate)?;
                check(edits)?;
                let q = edits
                    .iter()
                    .fold(SimpleExchangeQuote::new(*daily_rate), |q, e| q.apply(*e));
                push_payments(&mut out, q.amount, q.payment_in_main, q.payment_in_base);
                if let Some(wallet) = wallet {
                    out.push("benefit", q.benefit(wallet));
                }
            }
            Self::Deposit {
                wallet_kind,
                daily_rate,
                edits,
            } => {
                in_range("daily_rate", *daily_rate)?;
                check(edits)?;
                let q = edits
                    .iter()
                    .fold(DepositQuote::new(*wallet_kind, *daily_rate), |q, e| {
                        q.apply(*e)
                    });
                push_payments(&mut out, q.amount, q.payment_in_main, q.payment_in_base);
            }
        }
        Ok(out)
    }
}

fn push_payments(out: &mut QuoteSummary, amount: Decimal, main: Decimal, base: Decimal) {
    out.push("amount", amount);
    out.push("payment_in_main", main);
    out.push("payment_in_base", base);
}
