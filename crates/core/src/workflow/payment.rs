//! Payment sub-records and partial settlement.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// State of one payment. Stored as `1` (paid) or `2` (cancelled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentState {
    /// Counts toward the settled total.
    Paid,
    /// Voided; kept for the audit trail.
    Cancelled,
}

impl PaymentState {
    /// Wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Paid => 1,
            Self::Cancelled => 2,
        }
    }

    /// Any code other than 1 reads as cancelled.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        if code == 1 { Self::Paid } else { Self::Cancelled }
    }
}

impl Serialize for PaymentState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for PaymentState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(Self::from_code)
    }
}

/// Minimal view of a payment needed for settlement rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntry {
    /// Amount paid.
    pub amount: Decimal,
    /// Current state.
    pub state: PaymentState,
}

impl PaymentEntry {
    /// A live payment.
    #[must_use]
    pub const fn paid(amount: Decimal) -> Self {
        Self {
            amount,
            state: PaymentState::Paid,
        }
    }
}

/// Sum of the payments still in force.
#[must_use]
pub fn paid_total(payments: &[PaymentEntry]) -> Decimal {
    payments
        .iter()
        .filter(|p| p.state == PaymentState::Paid)
        .map(|p| p.amount)
        .sum()
}

/// Amount still owed, never negative.
#[must_use]
pub fn outstanding(amount: Decimal, payments: &[PaymentEntry]) -> Decimal {
    (amount - paid_total(payments)).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(1, PaymentState::Paid)]
    #[case(2, PaymentState::Cancelled)]
    #[case(0, PaymentState::Cancelled)]
    fn test_state_codes(#[case] code: i64, #[case] state: PaymentState) {
        assert_eq!(PaymentState::from_code(code), state);
        let parsed: PaymentState = serde_json::from_str(&code.to_string()).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_state_serializes_as_code() {
        assert_eq!(serde_json::to_string(&PaymentState::Cancelled).unwrap(), "2");
    }

    #[test]
    fn test_totals_skip_cancelled() {
        let payments = [
            PaymentEntry::paid(dec!(300)),
            PaymentEntry {
                amount: dec!(200),
                state: PaymentState::Cancelled,
            },
            PaymentEntry::paid(dec!(150)),
        ];
        assert_eq!(paid_total(&payments), dec!(450));
        assert_eq!(outstanding(dec!(1000), &payments), dec!(550));
        assert_eq!(outstanding(dec!(400), &payments), Decimal::ZERO);
    }
}
