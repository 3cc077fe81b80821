//! Property-based tests for trade commits and grouped selection.

use chrono::{Duration, TimeZone, Utc};
use fxdesk_shared::types::TransactionCode;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::commit::TradeCommit;
use super::kind::TradingType;
use super::selection::{TradeSummary, auto_select};
use super::wallet::WalletBalances;
use crate::workflow::types::TransactionState;

/// Strategy to generate positive amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive rates (0.0001 to 1000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn wallet_strategy() -> impl Strategy<Value = WalletBalances> {
    (positive_amount(), positive_amount(), positive_amount())
        .prop_map(|(crypto, trading, value)| WalletBalances::new(crypto, trading, value))
}

fn state_strategy() -> impl Strategy<Value = TransactionState> {
    prop_oneof![
        Just(TransactionState::Pending),
        Just(TransactionState::Review),
        Just(TransactionState::Paid),
    ]
}

fn trades_strategy() -> impl Strategy<Value = Vec<TradeSummary>> {
    prop::collection::vec((positive_amount(), state_strategy(), 0i64..1000), 0..20).prop_map(
        |rows| {
            let origin = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            rows.into_iter()
                .enumerate()
                .map(|(i, (amount, state, minutes))| TradeSummary {
                    code: TransactionCode::new(format!("T{i}")),
                    amount,
                    state,
                    created_at: origin + Duration::minutes(minutes),
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The result is always sold amount minus cost.
    #[test]
    fn prop_result_is_sold_minus_cost(
        wallet in wallet_strategy(),
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let commit = TradeCommit::compute(&wallet, TradingType::Sell, amount, rate);
        prop_assert_eq!(commit.trading_result, commit.sold_amount - commit.trading_cost);
    }

    /// A loss happens exactly when the sale is below the cost basis.
    #[test]
    fn prop_loss_iff_sold_below_cost(
        wallet in wallet_strategy(),
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let commit = TradeCommit::compute(&wallet, TradingType::Sell, amount, rate);
        prop_assert_eq!(commit.is_loss(), commit.sold_amount < commit.trading_cost);
    }

    /// A submittable auto-selection never exceeds the wallet balance and only
    /// holds pending trades.
    #[test]
    fn prop_auto_select_within_balance(
        wallet in wallet_strategy(),
        trades in trades_strategy(),
    ) {
        let selection = auto_select(&trades, &wallet);
        prop_assert!(selection.total <= wallet.trading_balance);
        if selection.can_submit(&wallet) {
            let sum: Decimal = trades
                .iter()
                .filter(|t| selection.codes.contains(&t.code))
                .map(|t| t.amount)
                .sum();
            prop_assert_eq!(sum, selection.total);
        }
        for code in &selection.codes {
            let trade = trades.iter().find(|t| &t.code == code).unwrap();
            prop_assert_eq!(trade.state, TransactionState::Pending);
        }
    }
}
