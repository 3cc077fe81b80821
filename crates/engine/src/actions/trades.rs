use fxdesk_core::request::{
    CommitTradeRequest, FieldError, PartnerPaidRequest, RequestCheck, TradeReviewRequest, TradeRollbackRequest,
    ValidationFailure, WalletTradeRequest, commit_request, grouped_commit_request, trade_payment,
};
use fxdesk_core::trading::{Selection, TradeSummary, auto_select, validate_selection};
use fxdesk_core::workflow::{TradeAction, TradeCorrection, TradeWorkflow, WorkflowError};
use fxdesk_shared::types::{TransactionCode, WalletId};
use futures::future::join_all;
use tracing::{info, warn};

use super::transactions::batch_outcome;
use super::{Desk, settle};
use crate::dto::{OfficeWalletResponse, WalletTradingResponse};
use crate::engine::AccountingEngine;
use crate::error::ActionError;
use crate::state::{BatchOutcome, State};

impl<E: AccountingEngine> Desk<E> {
    /// Creates a wallet trade.
    pub async fn trade_wallet(&self, request: WalletTradeRequest) -> State {
        settle("trade_wallet", self.try_trade_wallet(&request).await)
    }

    async fn try_trade_wallet(&self, request: &WalletTradeRequest) -> Result<String, ActionError> {
        request.check()?;
        let trade = self.engine.trade_wallet(request).await?;
        info!(code = %trade.code, wallet_id = %trade.wallet_id, "Trade requested");
        Ok("Trade Successful".to_string())
    }

    /// Approves, rejects or cancels a trade in Review.
    pub async fn review_trade(
        &self,
        wallet_id: &WalletId,
        code: &TransactionCode,
        request: TradeReviewRequest,
    ) -> State {
        settle("review_trade", self.try_review_trade(wallet_id, code, &request).await)
    }

    async fn try_review_trade(
        &self,
        wallet_id: &WalletId,
        code: &TransactionCode,
        request: &TradeReviewRequest,
    ) -> Result<String, ActionError> {
        request.check()?;
        let current = self.engine.get_trade(wallet_id, code).await?;
        TradeWorkflow::review(
            current.state,
            request.review.decision(),
            request.tags.clone(),
            self.operator,
        )
        .map_err(|err| match err {
            WorkflowError::InvalidTransition { .. } => {
                ActionError::Refused("Trade already reviewed".to_string())
            }
            other => other.into(),
        })?;

        self.engine.review_trade(wallet_id, code, request).await?;
        Ok(format!(
            "Trade {code} has been {} successfully",
            request.review.as_str()
        ))
    }

    /// Corrects a trade in Review or Rejected and sends it back to Review.
    pub async fn edit_trade(&self, request: WalletTradeRequest) -> State {
        settle("edit_trade", self.try_edit_trade(&request).await)
    }

    async fn try_edit_trade(&self, request: &WalletTradeRequest) -> Result<String, ActionError> {
        request.check()?;
        let code = request.code.as_deref().map(TransactionCode::from).ok_or_else(|| {
            ValidationFailure {
                message: "Invalid data".to_string(),
                errors: vec![FieldError::new("code", "This field is required")],
            }
        })?;
        let wallet_id = WalletId::from(request.wallet_id.as_str());
        let current = self.engine.get_trade(&wallet_id, &code).await?;
        TradeWorkflow::edit(
            current.state,
            TradeCorrection {
                amount: request.amount,
                trading_rate: request.trading_rate,
                daily_rate: request.daily_rate,
            },
        )?;

        self.engine.update_trade(request).await?;
        Ok(format!("Trade {code} updated successfully"))
    }

    /// Books a pending trade against its wallet.
    pub async fn commit_trade(&self, wallet_id: &WalletId, code: &TransactionCode) -> State {
        settle("commit_trade", self.try_commit_trade(wallet_id, code).await)
    }

    async fn try_commit_trade(&self, wallet_id: &WalletId, code: &TransactionCode) -> Result<String, ActionError> {
        let (wallet, trade) = futures::try_join!(
            self.engine.get_wallet(wallet_id),
            self.engine.get_trade(wallet_id, code),
        )?;
        let request = commit_for(&wallet, &trade, false)?;
        self.engine.commit_trade(&request).await?;
        Ok("Trade Committed Successfully".to_string())
    }

    /// Commits several trades of one wallet at once.
    ///
    /// Without `codes`, pending trades are picked oldest first while they fit
    /// in the trading balance. With `codes`, the selection must fit as a
    /// whole. Commits are sent concurrently and reported per code.
    pub async fn grouped_commit(
        &self,
        wallet_id: &WalletId,
        codes: Option<Vec<TransactionCode>>,
    ) -> BatchOutcome {
        let loaded = futures::try_join!(
            self.engine.get_wallet(wallet_id),
            self.engine.list_wallet_trades(wallet_id),
        );
        let (wallet, trades) = match loaded {
            Ok(loaded) => loaded,
            Err(err) => return refused_batch(err.into()),
        };

        let summaries: Vec<TradeSummary> = trades.iter().map(WalletTradingResponse::summary).collect();
        let balances = wallet.balances();
        let selection: Selection = match codes {
            Some(codes) => match validate_selection(&summaries, &codes, &balances) {
                Ok(selection) => selection,
                Err(err) => return refused_batch(err.into()),
            },
            None => auto_select(&summaries, &balances),
        };
        if selection.is_empty() {
            return refused_batch(WorkflowError::EmptySelection.into());
        }
        info!(%wallet_id, count = selection.codes.len(), total = %selection.total, "Grouped commit");

        let results = join_all(selection.codes.iter().map(|code| {
            let wallet = &wallet;
            let trade = trades.iter().find(|trade| &trade.code == code);
            async move {
                let result = match trade {
                    Some(trade) => self.send_grouped_commit(wallet, trade).await,
                    None => Err(WorkflowError::NotCommittable(code.clone()).into()),
                };
                (code.to_string(), settle("grouped_commit", result))
            }
        }))
        .await;
        batch_outcome("commit", results)
    }

    async fn send_grouped_commit(
        &self,
        wallet: &OfficeWalletResponse,
        trade: &WalletTradingResponse,
    ) -> Result<String, ActionError> {
        let request = commit_for(wallet, trade, true)?;
        self.engine.commit_trade(&request).await?;
        Ok(format!("Trade {} Committed Successfully", trade.code))
    }

    /// Settles a pending trade in cash from the FUND account.
    pub async fn pay_trade(&self, wallet_id: &WalletId, code: &TransactionCode, message: &str) -> State {
        settle("pay_trade", self.try_pay_trade(wallet_id, code, message).await)
    }

    async fn try_pay_trade(
        &self,
        wallet_id: &WalletId,
        code: &TransactionCode,
        message: &str,
    ) -> Result<String, ActionError> {
        let (wallet, trade) = futures::try_join!(
            self.engine.get_wallet(wallet_id),
            self.engine.get_trade(wallet_id, code),
        )?;
        let action = TradeWorkflow::pay(
            &trade.snapshot(),
            &wallet.balances(),
            wallet.wallet_type,
            message,
            self.operator,
        )?;
        let TradeAction::Settle {
            fund_payment: Some(amount),
            ..
        } = action
        else {
            return Err(ActionError::Refused(format!("Trade {code} cannot be paid")));
        };

        let request = trade_payment(amount, trade.daily_rate, message);
        request.check()?;
        self.engine.pay_trade(wallet_id, code, &request).await?;
        info!(%code, %wallet_id, %amount, "Trade paid from fund");
        Ok("Trade Paid Successfully".to_string())
    }

    /// Cancels a pending or paid trade.
    pub async fn rollback_trade(&self, wallet_id: &WalletId, request: TradeRollbackRequest) -> State {
        settle("rollback_trade", self.try_rollback_trade(wallet_id, &request).await)
    }

    async fn try_rollback_trade(
        &self,
        wallet_id: &WalletId,
        request: &TradeRollbackRequest,
    ) -> Result<String, ActionError> {
        let code = TransactionCode::from(request.code.as_str());
        let current = self.engine.get_trade(wallet_id, &code).await?;
        TradeWorkflow::cancel(current.state, &request.reason, self.operator)?;

        self.engine.rollback_trade(wallet_id, request).await?;
        Ok(format!("Trade {code} has been cancelled"))
    }

    /// Sets the partner-paid milestone of a SELL trade. The state is untouched.
    pub async fn update_partner_paid(&self, wallet_id: &WalletId, request: PartnerPaidRequest) -> State {
        settle("update_partner_paid", self.try_update_partner_paid(wallet_id, &request).await)
    }

    async fn try_update_partner_paid(
        &self,
        wallet_id: &WalletId,
        request: &PartnerPaidRequest,
    ) -> Result<String, ActionError> {
        let code = TransactionCode::from(request.code.as_str());
        let current = self.engine.get_trade(wallet_id, &code).await?;
        let paid = TradeWorkflow::partner_paid(current.trading_type, request.partner_paid)?;

        self.engine.update_partner_paid(wallet_id, request).await?;
        Ok(if paid {
            format!("Trade {code} marked as paid by partner")
        } else {
            format!("Trade {code} marked as unpaid by partner")
        })
    }

    /// Turns on partner balance tracking for a wallet. There is no way back.
    pub async fn enable_partner_balance_tracking(&self, wallet_id: &WalletId) -> State {
        settle(
            "enable_partner_balance_tracking",
            self.try_enable_partner_balance_tracking(wallet_id).await,
        )
    }

    async fn try_enable_partner_balance_tracking(&self, wallet_id: &WalletId) -> Result<String, ActionError> {
        let wallet = self.engine.get_wallet(wallet_id).await?;
        if !TradeWorkflow::needs_balance_tracking_enable(wallet.balance_tracking_enabled) {
            return Ok(format!("Balance tracking already enabled for wallet {wallet_id}"));
        }
        self.engine.enable_balance_tracking(wallet_id).await?;
        Ok(format!("Balance tracking enabled for wallet {wallet_id}"))
    }
}

/// Commit request for one trade, after the settlement guard.
fn commit_for(
    wallet: &OfficeWalletResponse,
    trade: &WalletTradingResponse,
    grouped: bool,
) -> Result<CommitTradeRequest, ActionError> {
    let action = TradeWorkflow::commit(&trade.snapshot(), &wallet.balances())?;
    let TradeAction::Settle { commit, .. } = action else {
        return Err(WorkflowError::NotCommittable(trade.code.clone()).into());
    };
    if commit.is_loss() {
        warn!(code = %trade.code, result = %commit.trading_result, "Trade committed at a loss");
    }
    Ok(if grouped {
        grouped_commit_request(&wallet.wallet_id, &trade.id, &trade.code, &commit)
    } else {
        commit_request(&wallet.wallet_id, &trade.id, &commit)
    })
}

fn refused_batch(err: ActionError) -> BatchOutcome {
    BatchOutcome {
        states: Vec::new(),
        state: settle("grouped_commit", Err(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::fixtures::{desk, trade, wallet};
    use crate::engine::MockAccountingEngine;
    use crate::error::EngineError;
    use crate::state::FailureKind;
    use fxdesk_core::request::TradeRequestKind;
    use fxdesk_core::trading::{TradingType, WalletKind};
    use fxdesk_core::workflow::{TransactionState, TransactionType, ValidationState};
    use fxdesk_shared::types::{AssetCode, Currency};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn w1() -> WalletId {
        WalletId::from("W1")
    }

    fn sell_request() -> WalletTradeRequest {
        WalletTradeRequest {
            code: None,
            wallet_id: "W1".to_string(),
            trading_currency: None,
            exchange_currency: None,
            selling_currency: None,
            trading_type: TradingType::Sell,
            amount: dec!(400),
            daily_rate: dec!(3.67),
            trading_rate: dec!(3.2),
            message: None,
            request: TradeRequestKind::Sell {
                customer: "CUS".to_string(),
                currency: AssetCode::Fiat(Currency::Aed),
            },
        }
    }

    #[tokio::test]
    async fn test_trade_wallet() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_trade_wallet()
            .times(1)
            .returning(|_| Ok(trade("TRD-1", TradingType::Sell, TransactionState::Review, dec!(400), 1)));

        let state = desk(engine).trade_wallet(sell_request()).await;
        assert_eq!(state.message, "Trade Successful");
    }

    #[tokio::test]
    async fn test_mismatched_trade_request() {
        let mut engine = MockAccountingEngine::new();
        engine.expect_trade_wallet().never();

        let mut request = sell_request();
        request.trading_type = TradingType::Buy;
        let state = desk(engine).trade_wallet(request).await;
        assert_eq!(state.message, "Invalid data");
        assert_eq!(state.errors[0].path, "request.request_type");
    }

    #[tokio::test]
    async fn test_review_trade_needs_tags_to_reject() {
        let mut engine = MockAccountingEngine::new();
        engine.expect_get_trade().never();

        let state = desk(engine)
            .review_trade(
                &w1(),
                &TransactionCode::from("TRD-1"),
                TradeReviewRequest {
                    review: ValidationState::Rejected,
                    tags: vec![],
                },
            )
            .await;
        assert_eq!(state.kind, Some(FailureKind::Validation));
    }

    #[tokio::test]
    async fn test_review_trade() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_trade()
            .returning(|_, _| Ok(trade("TRD-1", TradingType::Sell, TransactionState::Review, dec!(400), 1)));
        engine
            .expect_review_trade()
            .times(1)
            .returning(|_, _, _| Ok(trade("TRD-1", TradingType::Sell, TransactionState::Cancelled, dec!(400), 1)));

        let state = desk(engine)
            .review_trade(
                &w1(),
                &TransactionCode::from("TRD-1"),
                TradeReviewRequest {
                    review: ValidationState::Cancelled,
                    tags: vec!["duplicate".to_string()],
                },
            )
            .await;
        assert_eq!(state.message, "Trade TRD-1 has been CANCELLED successfully");
    }

    #[tokio::test]
    async fn test_edit_needs_code() {
        let engine = MockAccountingEngine::new();
        let state = desk(engine).edit_trade(sell_request()).await;
        assert_eq!(state.errors[0].path, "code");
    }

    #[tokio::test]
    async fn test_edit_rejected_trade() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_trade()
            .returning(|_, _| Ok(trade("TRD-1", TradingType::Sell, TransactionState::Rejected, dec!(400), 1)));
        engine
            .expect_update_trade()
            .withf(|request| request.code.as_deref() == Some("TRD-1"))
            .times(1)
            .returning(|_| Ok(trade("TRD-1", TradingType::Sell, TransactionState::Review, dec!(400), 1)));

        let request = sell_request().editing(&TransactionCode::from("TRD-1"));
        let state = desk(engine).edit_trade(request).await;
        assert_eq!(state.message, "Trade TRD-1 updated successfully");
    }

    #[tokio::test]
    async fn test_commit_sends_computed_figures() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_wallet()
            .returning(|_| Ok(wallet(WalletKind::Crypto, false)));
        engine
            .expect_get_trade()
            .returning(|_, _| Ok(trade("TRD-1", TradingType::Sell, TransactionState::Pending, dec!(400), 1)));
        engine
            .expect_commit_trade()
            .withf(|request| {
                request.trade_id == "id-TRD-1"
                    && request.trading_cost == dec!(100)
                    && request.sold_amount == dec!(125)
                    && request.trading_result == dec!(25)
                    && request.crypto_amount == dec!(0.2)
            })
            .times(1)
            .returning(|_| Ok(trade("TRD-1", TradingType::Sell, TransactionState::Paid, dec!(400), 1)));

        let state = desk(engine)
            .commit_trade(&w1(), &TransactionCode::from("TRD-1"))
            .await;
        assert_eq!(state.message, "Trade Committed Successfully");
    }

    #[tokio::test]
    async fn test_commit_over_balance() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_wallet()
            .returning(|_| Ok(wallet(WalletKind::Crypto, false)));
        engine
            .expect_get_trade()
            .returning(|_, _| Ok(trade("TRD-1", TradingType::Sell, TransactionState::Pending, dec!(4001), 1)));
        engine.expect_commit_trade().never();

        let state = desk(engine)
            .commit_trade(&w1(), &TransactionCode::from("TRD-1"))
            .await;
        assert_eq!(state.kind, Some(FailureKind::Rejected));
    }

    fn pending_trades() -> Vec<WalletTradingResponse> {
        vec![
            trade("T3", TradingType::Sell, TransactionState::Pending, dec!(1500), 3),
            trade("T1", TradingType::Sell, TransactionState::Pending, dec!(2000), 1),
            trade("T2", TradingType::Sell, TransactionState::Pending, dec!(2500), 2),
            trade("T0", TradingType::Sell, TransactionState::Review, dec!(10), 1),
        ]
    }

    #[tokio::test]
    async fn test_grouped_commit_auto_selects_oldest_first() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_wallet()
            .returning(|_| Ok(wallet(WalletKind::Crypto, false)));
        engine
            .expect_list_wallet_trades()
            .returning(|_| Ok(pending_trades()));
        engine
            .expect_commit_trade()
            .times(2)
            .returning(|request| {
                let code = request.code.clone().unwrap_or_default();
                if code == "T3" {
                    return Err(EngineError::Transport("reset".to_string()));
                }
                Ok(trade(&code, TradingType::Sell, TransactionState::Paid, Decimal::ONE, 1))
            });

        let outcome = desk(engine).grouped_commit(&w1(), None).await;
        assert_eq!(outcome.states.len(), 2);
        assert_eq!(outcome.state_of("T1"), Some(1));
        assert_eq!(outcome.state_of("T3"), Some(0));
        assert_eq!(outcome.state_of("T2"), None);
    }

    #[tokio::test]
    async fn test_grouped_commit_selection_over_balance() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_wallet()
            .returning(|_| Ok(wallet(WalletKind::Crypto, false)));
        engine
            .expect_list_wallet_trades()
            .returning(|_| Ok(pending_trades()));
        engine.expect_commit_trade().never();

        let codes = vec![TransactionCode::from("T1"), TransactionCode::from("T2")];
        let outcome = desk(engine).grouped_commit(&w1(), Some(codes)).await;
        assert!(outcome.states.is_empty());
        assert!(!outcome.state.is_success());
    }

    #[tokio::test]
    async fn test_pay_simple_deposit_from_fund() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_wallet()
            .returning(|_| Ok(wallet(WalletKind::Simple, false)));
        engine.expect_get_trade().returning(|_, _| {
            let mut deposit = trade("DEP-1", TradingType::Deposit, TransactionState::Pending, dec!(1000), 1);
            deposit.trading_rate = dec!(2);
            Ok(deposit)
        });
        engine
            .expect_pay_trade()
            .withf(|_, code, request| {
                code.as_str() == "DEP-1"
                    && request.amount == dec!(1020)
                    && request.rate == dec!(3.67)
                    && request.payment_type == TransactionType::Forex
            })
            .times(1)
            .returning(|_, _, _| Ok(trade("DEP-1", TradingType::Deposit, TransactionState::Paid, dec!(1000), 1)));

        let state = desk(engine)
            .pay_trade(&w1(), &TransactionCode::from("DEP-1"), "cash from fund")
            .await;
        assert_eq!(state.message, "Trade Paid Successfully");
    }

    #[tokio::test]
    async fn test_rollback_needs_reason() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_trade()
            .returning(|_, _| Ok(trade("TRD-1", TradingType::Sell, TransactionState::Paid, dec!(400), 1)));
        engine.expect_rollback_trade().never();

        let state = desk(engine)
            .rollback_trade(
                &w1(),
                TradeRollbackRequest {
                    code: "TRD-1".to_string(),
                    reason: " ".to_string(),
                },
            )
            .await;
        assert_eq!(state.kind, Some(FailureKind::Rejected));
    }

    #[tokio::test]
    async fn test_partner_paid_on_buy_is_refused() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_trade()
            .returning(|_, _| Ok(trade("TRD-1", TradingType::Buy, TransactionState::Paid, dec!(400), 1)));
        engine.expect_update_partner_paid().never();

        let state = desk(engine)
            .update_partner_paid(
                &w1(),
                PartnerPaidRequest {
                    code: "TRD-1".to_string(),
                    partner_paid: true,
                },
            )
            .await;
        assert!(!state.is_success());
    }

    #[tokio::test]
    async fn test_partner_paid_on_simple_sell() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_trade()
            .returning(|_, _| Ok(trade("TRD-1", TradingType::SimpleSell, TransactionState::Paid, dec!(400), 1)));
        engine
            .expect_update_partner_paid()
            .times(1)
            .returning(|_, _| Ok(trade("TRD-1", TradingType::SimpleSell, TransactionState::Paid, dec!(400), 1)));

        let state = desk(engine)
            .update_partner_paid(
                &w1(),
                PartnerPaidRequest {
                    code: "TRD-1".to_string(),
                    partner_paid: true,
                },
            )
            .await;
        assert_eq!(state.message, "Trade TRD-1 marked as paid by partner");
    }

    #[tokio::test]
    async fn test_balance_tracking_enabled_once() {
        let mut engine = MockAccountingEngine::new();
        engine
            .expect_get_wallet()
            .returning(|_| Ok(wallet(WalletKind::Crypto, true)));
        engine.expect_enable_balance_tracking().never();

        let state = desk(engine).enable_partner_balance_tracking(&w1()).await;
        assert!(state.is_success());
        assert_eq!(state.message, "Balance tracking already enabled for wallet W1");
    }
}
