//! Property-based tests for the converters.
//!
//! - Round-trip through the transfer rate
//! - Zero divisors yield zero
//! - BANKTT legs are independent

use fxdesk_shared::types::{AssetCode, Currency};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::forex::{BankTtEdit, BankTtQuote, ForexEdit, ForexQuote};
use super::transfer::{TransferEdit, TransferQuote};
use super::wallet::{BuyQuote, SellQuote, SimpleExchangeEdit, SimpleExchangeQuote, WalletEdit};

/// Strategy to generate positive amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate non-negative rates, zero included.
fn any_rate() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate markup percentages (0.00 to 50.00).
fn percentage() -> impl Strategy<Value = Decimal> {
    (0i64..5_000i64).prop_map(|v| Decimal::new(v, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Converting amount to converted amount and back recovers the amount.
    #[test]
    fn prop_transfer_round_trip(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let forward = TransferQuote::new(rate).apply(TransferEdit::Amount(amount));
        let back = forward.apply(TransferEdit::ConvertedAmount(forward.converted_amount));
        let drift = (back.amount - amount).abs();
        prop_assert!(
            drift <= Decimal::new(1, 10),
            "Round trip drifted by {} ({} -> {})",
            drift, amount, back.amount
        );
    }

    /// Every formula with a zero divisor yields zero.
    #[test]
    fn prop_zero_divisor_yields_zero(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let transfer = TransferQuote::new(Decimal::ZERO)
            .apply(TransferEdit::ConvertedAmount(amount));
        prop_assert_eq!(transfer.amount, Decimal::ZERO);

        let buy = BuyQuote::new(Decimal::ZERO, rate).apply(WalletEdit::Amount(amount));
        prop_assert_eq!(buy.payment_in_main, Decimal::ZERO);

        let aed = AssetCode::Fiat(Currency::Aed);
        let sell = SellQuote::new(aed, aed, rate).apply(WalletEdit::Amount(amount));
        prop_assert_eq!(sell.payment_in_main, Decimal::ZERO);
        prop_assert_eq!(sell.payment_in_base, Decimal::ZERO);

        let forex = ForexQuote::new(rate).apply(ForexEdit::Amount(amount));
        prop_assert_eq!(forex.amount_in_main, Decimal::ZERO);
        prop_assert_eq!(forex.provider_payment(), Decimal::ZERO);

        let bank_tt = BankTtQuote::new(Decimal::ZERO)
            .apply(BankTtEdit::BankRate(rate))
            .apply(BankTtEdit::Amount(amount));
        prop_assert_eq!(bank_tt.bank_amount_in_main, Decimal::ZERO);

        let simple = SimpleExchangeQuote::new(rate)
            .apply(SimpleExchangeEdit::ExchangeRate(rate))
            .apply(SimpleExchangeEdit::Amount(amount));
        prop_assert_eq!(simple.payment_in_base, Decimal::ZERO);
    }

    /// Bank-side edits never move the customer leg.
    #[test]
    fn prop_bank_tt_bank_edits_keep_customer_leg(
        amount in positive_amount(),
        daily_rate in any_rate(),
        selling_rate in percentage(),
        bank_rate in any_rate(),
        bank_fees in positive_amount(),
    ) {
        let before = BankTtQuote::new(daily_rate)
            .apply(BankTtEdit::SellingRate(selling_rate))
            .apply(BankTtEdit::Amount(amount));
        let after = before
            .apply(BankTtEdit::BankRate(bank_rate))
            .apply(BankTtEdit::BankFees(bank_fees));
        prop_assert_eq!(after.amount_in_main, before.amount_in_main);
        prop_assert_eq!(after.amount_in_base, before.amount_in_base);
    }

    /// Customer-side edits never move the bank leg.
    #[test]
    fn prop_bank_tt_customer_edits_keep_bank_leg(
        amount in positive_amount(),
        daily_rate in positive_rate(),
        bank_rate in any_rate(),
        selling_rate in percentage(),
    ) {
        let before = BankTtQuote::new(daily_rate)
            .apply(BankTtEdit::BankRate(bank_rate))
            .apply(BankTtEdit::Amount(amount));
        let after = before.apply(BankTtEdit::SellingRate(selling_rate));
        prop_assert_eq!(after.bank_amount_in_base, before.bank_amount_in_base);
        prop_assert_eq!(after.bank_amount_in_main, before.bank_amount_in_main);
    }
}
