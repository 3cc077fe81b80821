//! Forex quotes: bank telegraphic transfers and provider-quoted forex
//! (ALI PAY, TT RMB).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::guard::{markup_factor, safe_div, safe_mul};

/// Form state of a BANKTT forex transaction.
///
/// Two legs are derived from the same buying-currency `amount`:
/// - customer leg: what the customer pays the office, with the selling markup
/// - bank leg: what the office pays the bank
///
/// The legs never feed into each other; their spread is the benefit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankTtQuote {
    /// Main to base currency rate.
    pub daily_rate: Decimal,
    /// Bank's rate, in base currency per unit of buying currency.
    pub bank_rate: Decimal,
    /// Flat bank fee in base currency.
    pub bank_fees: Decimal,
    /// Markup charged to the customer, in percent.
    pub selling_rate: Decimal,
    /// Amount in the buying currency.
    pub amount: Decimal,
    /// Customer leg in main currency.
    pub amount_in_main: Decimal,
    /// Customer leg in base currency.
    pub amount_in_base: Decimal,
    /// Bank leg in base currency.
    pub bank_amount_in_base: Decimal,
    /// Bank leg in main currency.
    pub bank_amount_in_main: Decimal,
}

/// The BANKTT field the user edited last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum BankTtEdit {
    /// Daily rate changed.
    DailyRate(Decimal),
    /// Bank rate changed.
    BankRate(Decimal),
    /// Bank fees changed.
    BankFees(Decimal),
    /// Selling markup changed.
    SellingRate(Decimal),
    /// Buying-currency amount changed.
    Amount(Decimal),
    /// Customer payment in base currency changed.
    AmountInBase(Decimal),
    /// Customer payment in main currency changed.
    AmountInMain(Decimal),
}

impl BankTtQuote {
    /// Creates an empty quote at the given daily rate.
    #[must_use]
    pub fn new(daily_rate: Decimal) -> Self {
        Self {
            daily_rate,
            ..Self::default()
        }
    }

    /// Applies one edit and recomputes every dependent field.
    #[must_use]
    pub fn apply(mut self, edit: BankTtEdit) -> Self {
        match edit {
            BankTtEdit::DailyRate(rate) => {
                self.daily_rate = rate;
                self.customer_leg_from_amount();
            }
            BankTtEdit::BankRate(rate) => self.bank_rate = rate,
            BankTtEdit::BankFees(fees) => self.bank_fees = fees,
            BankTtEdit::SellingRate(rate) => {
                self.selling_rate = rate;
                self.customer_leg_from_amount();
            }
            BankTtEdit::Amount(amount) => {
                self.amount = amount;
                self.customer_leg_from_amount();
            }
            BankTtEdit::AmountInBase(base) => {
                self.amount_in_base = base;
                self.amount_in_main = safe_div(base, self.daily_rate);
                self.amount = safe_div(self.amount_in_main, markup_factor(self.selling_rate));
            }
            BankTtEdit::AmountInMain(main) => {
                self.amount_in_main = main;
                self.amount = safe_div(main, markup_factor(self.selling_rate));
                self.amount_in_base = safe_mul(main, self.daily_rate);
            }
        }
        self.bank_leg_from_amount();
        self
    }

    /// Spread between the customer leg and the bank leg, in base currency.
    #[must_use]
    pub fn benefit_in_base(&self) -> Decimal {
        self.amount_in_base - self.bank_amount_in_base
    }

    /// Spread between the customer leg and the bank leg, in main currency.
    #[must_use]
    pub fn benefit_in_main(&self) -> Decimal {
        self.amount_in_main - self.bank_amount_in_main
    }

    fn customer_leg_from_amount(&mut self) {
        self.amount_in_main = safe_mul(self.amount, markup_factor(self.selling_rate));
        self.amount_in_base = safe_mul(self.amount_in_main, self.daily_rate);
    }

    fn bank_leg_from_amount(&mut self) {
        self.bank_amount_in_base = safe_mul(self.amount, self.bank_rate) + self.bank_fees;
        self.bank_amount_in_main = safe_div(self.bank_amount_in_base, self.daily_rate);
    }
}

/// Form state of a provider-quoted forex transaction (ALI PAY, TT RMB).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForexQuote {
    /// Main to base currency rate.
    pub daily_rate: Decimal,
    /// Rate quoted by the provider, per unit of base currency.
    pub intermediate_buying_rate: Decimal,
    /// Provider rate per unit of main currency: `intermediate_buying_rate * daily_rate`.
    pub buying_rate: Decimal,
    /// Rate quoted to the customer, per unit of main currency.
    pub selling_rate: Decimal,
    /// Customer rate per unit of base currency: `selling_rate / daily_rate`.
    pub intermediate_selling_rate: Decimal,
    /// Amount in the buying currency.
    pub amount: Decimal,
    /// Amount in main currency: `amount / selling_rate`.
    pub amount_in_main: Decimal,
    /// Amount in base currency: `amount_in_main * daily_rate`.
    pub amount_in_base: Decimal,
}

/// The forex field the user edited last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ForexEdit {
    /// Daily rate changed.
    DailyRate(Decimal),
    /// Provider's base-currency rate changed.
    IntermediateBuyingRate(Decimal),
    /// Provider's main-currency rate typed in directly.
    BuyingRate(Decimal),
    /// Customer rate changed.
    SellingRate(Decimal),
    /// Buying-currency amount changed.
    Amount(Decimal),
    /// Base-currency amount changed.
    AmountInBase(Decimal),
    /// Main-currency amount changed.
    AmountInMain(Decimal),
}

impl ForexQuote {
    /// Creates an empty quote at the given daily rate.
    #[must_use]
    pub fn new(daily_rate: Decimal) -> Self {
        Self {
            daily_rate,
            ..Self::default()
        }
    }

    /// Applies one edit and recomputes every dependent field.
    ///
    /// Rate edits keep the buying-currency amount and re-derive the other two.
    #[must_use]
    pub fn apply(mut self, edit: ForexEdit) -> Self {
        match edit {
            ForexEdit::DailyRate(rate) => {
                self.daily_rate = rate;
                self.buying_rate = safe_mul(self.intermediate_buying_rate, rate);
                self.intermediate_selling_rate = safe_div(self.selling_rate, rate);
                self.amounts_from_buying_currency();
            }
            ForexEdit::IntermediateBuyingRate(rate) => {
                self.intermediate_buying_rate = rate;
                self.buying_rate = safe_mul(rate, self.daily_rate);
            }
            ForexEdit::BuyingRate(rate) => {
                self.buying_rate = rate;
                self.intermediate_buying_rate = safe_div(rate, self.daily_rate);
            }
            ForexEdit::SellingRate(rate) => {
                self.selling_rate = rate;
                self.intermediate_selling_rate = safe_div(rate, self.daily_rate);
                self.amounts_from_buying_currency();
            }
            ForexEdit::Amount(amount) => {
                self.amount = amount;
                self.amounts_from_buying_currency();
            }
            ForexEdit::AmountInBase(base) => {
                self.amount_in_base = base;
                self.amount_in_main = safe_div(base, self.daily_rate);
                self.amount = safe_mul(self.amount_in_main, self.selling_rate);
            }
            ForexEdit::AmountInMain(main) => {
                self.amount_in_main = main;
                self.amount = safe_mul(main, self.selling_rate);
                self.amount_in_base = safe_mul(main, self.daily_rate);
            }
        }
        self
    }

    /// What the office owes the provider, in main currency.
    #[must_use]
    pub fn provider_payment(&self) -> Decimal {
        safe_div(self.amount, self.buying_rate)
    }

    /// Customer payment minus provider payment, in main currency.
    #[must_use]
    pub fn benefit_in_main(&self) -> Decimal {
        self.amount_in_main - self.provider_payment()
    }

    fn amounts_from_buying_currency(&mut self) {
        self.amount_in_main = safe_div(self.amount, self.selling_rate);
        self.amount_in_base = safe_mul(self.amount_in_main, self.daily_rate);
    }
}
