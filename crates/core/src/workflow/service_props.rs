//! Property-based tests for the transaction and trade lifecycle.
//!
//! - Review only succeeds from Review
//! - Pay only succeeds from Pending for payable types
//! - Failed transitions report the state they started from

use fxdesk_shared::types::UserId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::trading::{TradingType, WalletBalances};
use crate::workflow::error::WorkflowError;
use crate::workflow::payment::PaymentEntry;
use crate::workflow::service::{PaymentInput, TransactionWorkflow};
use crate::workflow::trade::{TradeSnapshot, TradeWorkflow};
use crate::workflow::types::{ReviewDecision, TransactionState, TransactionType};

fn arb_state() -> impl Strategy<Value = TransactionState> {
    prop_oneof![
        Just(TransactionState::Review),
        Just(TransactionState::Pending),
        Just(TransactionState::Paid),
        Just(TransactionState::Cancelled),
        Just(TransactionState::Rejected),
    ]
}

fn arb_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Internal),
        Just(TransactionType::External),
        Just(TransactionType::Deposit),
        Just(TransactionType::Sending),
        Just(TransactionType::Forex),
    ]
}

fn arb_decision() -> impl Strategy<Value = ReviewDecision> {
    prop_oneof![
        Just(ReviewDecision::Approve),
        Just(ReviewDecision::Reject),
        Just(ReviewDecision::Cancel),
    ]
}

/// Strategy to generate positive amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Review succeeds exactly from Review, and lands on the decision's state.
    #[test]
    fn prop_review_only_from_review(state in arb_state(), decision in arb_decision()) {
        let result = TransactionWorkflow::review(state, decision, "checked", UserId::new());
        if state == TransactionState::Review {
            prop_assert_eq!(result.unwrap().new_state(), decision.target_state());
        } else {
            prop_assert!(matches!(
                result,
                Err(WorkflowError::InvalidTransition { from, .. }) if from == state
            ), "expected InvalidTransition from {:?}", state);
        }
    }

    /// Trade review follows the same rule.
    #[test]
    fn prop_trade_review_only_from_review(state in arb_state(), decision in arb_decision()) {
        let result = TradeWorkflow::review(state, decision, vec!["ok".into()], UserId::new());
        prop_assert_eq!(result.is_ok(), state == TransactionState::Review);
    }

    /// Pay succeeds exactly from Pending with a payable type.
    #[test]
    fn prop_pay_only_pending_and_payable(
        state in arb_state(),
        kind in arb_type(),
        amount in positive_amount(),
    ) {
        let result = TransactionWorkflow::pay(
            state,
            kind,
            amount,
            &[],
            PaymentInput { amount, message: String::new() },
            UserId::new(),
        );
        let legal = state == TransactionState::Pending && kind.is_payable();
        prop_assert_eq!(result.is_ok(), legal);
        if let Ok(action) = result {
            prop_assert_eq!(action.new_state(), TransactionState::Paid);
        }
    }

    /// A payment never pushes the paid total past the amount.
    #[test]
    fn prop_payments_never_exceed_amount(
        amount in positive_amount(),
        earlier in positive_amount(),
        now in positive_amount(),
    ) {
        let payments = [PaymentEntry::paid(earlier)];
        let result = TransactionWorkflow::pay(
            TransactionState::Pending,
            TransactionType::External,
            amount,
            &payments,
            PaymentInput { amount: now, message: String::new() },
            UserId::new(),
        );
        prop_assert_eq!(result.is_ok(), earlier + now <= amount);
    }

    /// Trade settlement needs Pending and a covering balance.
    #[test]
    fn prop_trade_commit_guard(
        state in arb_state(),
        amount in positive_amount(),
        balance in positive_amount(),
    ) {
        let trade = TradeSnapshot {
            state,
            trading_type: TradingType::Sell,
            amount,
            daily_rate: Decimal::ONE,
            trading_rate: Decimal::ONE,
        };
        let wallet = WalletBalances::new(Decimal::ONE, balance, Decimal::ONE);
        let result = TradeWorkflow::commit(&trade, &wallet);
        prop_assert_eq!(
            result.is_ok(),
            state == TransactionState::Pending && amount <= balance
        );
    }
}
