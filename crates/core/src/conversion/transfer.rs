//! Two-currency conversion used by internal, deposit, sending and external
//! transactions.
//!
//! `converted_amount = amount * rate`, and back through [`safe_div`]. Charges
//! follow the amount while a charge percentage is set; a charge typed in by
//! hand never back-computes the percentage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::guard::{percent_of, safe_div, safe_mul};

/// Form state of a two-currency transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferQuote {
    /// Conversion rate from the amount currency to the converted currency.
    pub rate: Decimal,
    /// Amount in the transaction currency.
    pub amount: Decimal,
    /// `amount * rate`.
    pub converted_amount: Decimal,
    /// Percentage charged on the amount (zero when charges are entered by hand).
    pub charge_percentage: Decimal,
    /// Charges in the transaction currency.
    pub charges: Decimal,
}

/// The field the user edited last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TransferEdit {
    /// Conversion rate changed; `amount` stays, `converted_amount` follows.
    Rate(Decimal),
    /// Amount changed.
    Amount(Decimal),
    /// Converted amount changed; `amount` is back-computed.
    ConvertedAmount(Decimal),
    /// Charge percentage changed.
    ChargePercentage(Decimal),
    /// Charges typed in directly.
    Charges(Decimal),
}

impl TransferQuote {
    /// Creates an empty quote at the given rate.
    #[must_use]
    pub fn new(rate: Decimal) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    /// Applies one edit and recomputes every dependent field.
    #[must_use]
    pub fn apply(mut self, edit: TransferEdit) -> Self {
        match edit {
            TransferEdit::Rate(rate) => {
                self.rate = rate;
                self.converted_amount = safe_mul(self.amount, rate);
            }
            TransferEdit::Amount(amount) => {
                self.amount = amount;
                self.converted_amount = safe_mul(amount, self.rate);
                self.refresh_charges();
            }
            TransferEdit::ConvertedAmount(converted) => {
                self.converted_amount = converted;
                self.amount = safe_div(converted, self.rate);
                self.refresh_charges();
            }
            TransferEdit::ChargePercentage(percent) => {
                self.charge_percentage = percent;
                self.charges = percent_of(self.amount, percent);
            }
            TransferEdit::Charges(charges) => {
                self.charge_percentage = Decimal::ZERO;
                self.charges = charges;
            }
        }
        self
    }

    /// Converted value of the charges.
    #[must_use]
    pub fn converted_charges(&self) -> Decimal {
        safe_mul(self.charges, self.rate)
    }

    fn refresh_charges(&mut self) {
        if !self.charge_percentage.is_zero() {
            self.charges = percent_of(self.amount, self.charge_percentage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_to_converted() {
        let quote = TransferQuote::new(dec!(3.67)).apply(TransferEdit::Amount(dec!(100)));
        assert_eq!(quote.converted_amount, dec!(367.00));
    }

    #[test]
    fn test_converted_back_to_amount() {
        let quote = TransferQuote::new(dec!(3.67))
            .apply(TransferEdit::Amount(dec!(100)))
            .apply(TransferEdit::ConvertedAmount(dec!(36.70)));
        assert_eq!(quote.amount, dec!(10));
    }

    #[test]
    fn test_overflowing_product_is_zero() {
        let quote = TransferQuote::new(dec!(100))
            .apply(TransferEdit::ChargePercentage(dec!(5)))
            .apply(TransferEdit::Amount(Decimal::MAX));
        assert_eq!(quote.converted_amount, Decimal::ZERO);
        assert_eq!(quote.charges, Decimal::ZERO);
        assert_eq!(quote.converted_charges(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_back_compute_is_zero() {
        let quote = TransferQuote::new(Decimal::ZERO).apply(TransferEdit::ConvertedAmount(dec!(50)));
        assert_eq!(quote.amount, Decimal::ZERO);
    }

    #[test]
    fn test_rate_change_keeps_amount() {
        let quote = TransferQuote::new(dec!(3.67))
            .apply(TransferEdit::Amount(dec!(10)))
            .apply(TransferEdit::Rate(dec!(3.7)));
        assert_eq!(quote.amount, dec!(10));
        assert_eq!(quote.converted_amount, dec!(37.0));
    }

    #[test]
    fn test_charges_follow_amount_when_percentage_set() {
        let quote = TransferQuote::new(dec!(1))
            .apply(TransferEdit::ChargePercentage(dec!(2)))
            .apply(TransferEdit::Amount(dec!(500)));
        assert_eq!(quote.charges, dec!(10));

        let quote = quote.apply(TransferEdit::ChargePercentage(dec!(3)));
        assert_eq!(quote.charges, dec!(15));
    }

    #[test]
    fn test_manual_charges_do_not_back_compute_percentage() {
        let quote = TransferQuote::new(dec!(1))
            .apply(TransferEdit::Amount(dec!(500)))
            .apply(TransferEdit::ChargePercentage(dec!(2)))
            .apply(TransferEdit::Charges(dec!(7)));
        assert_eq!(quote.charges, dec!(7));
        assert_eq!(quote.charge_percentage, Decimal::ZERO);

        // Without a percentage, later amount edits leave the manual charge alone.
        let quote = quote.apply(TransferEdit::Amount(dec!(600)));
        assert_eq!(quote.charges, dec!(7));
    }

    #[test]
    fn test_converted_charges() {
        let quote = TransferQuote::new(dec!(3.67)).apply(TransferEdit::Charges(dec!(10)));
        assert_eq!(quote.converted_charges(), dec!(36.70));
    }
}
