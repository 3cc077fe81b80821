//! The accounting engine contract.

use async_trait::async_trait;
use fxdesk_core::request::{
    CancellationRequest, CommitTradeRequest, OpenAccountRequest, PartnerPaidRequest,
    PaymentRequest, TradeReviewRequest, TradeRollbackRequest, TransactionRequest,
    TransactionReviewRequest, TransactionUpdateRequest, UpdateAccountRequest, WalletTradeRequest,
};
use fxdesk_core::workflow::TransactionType;
use fxdesk_shared::types::{TransactionCode, WalletId};

use crate::dto::{
    AccountResponse, OfficeWalletResponse, PaymentResponse, TransactionResponse,
    WalletTradingResponse,
};
use crate::error::EngineError;

/// Result type for engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// The external engine that owns every balance and state.
///
/// Each method is one round trip. Nothing is retried.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountingEngine: Send + Sync {
    /// Creates a transaction.
    async fn request_transaction(&self, request: &TransactionRequest) -> EngineResult<TransactionResponse>;

    /// Fetches one transaction.
    async fn get_transaction(
        &self,
        code: &TransactionCode,
        transaction_type: TransactionType,
    ) -> EngineResult<TransactionResponse>;

    /// Records a review decision.
    async fn review_transaction(&self, request: &TransactionReviewRequest) -> EngineResult<TransactionResponse>;

    /// Corrects a transaction in Review or Rejected.
    async fn update_transaction(&self, request: &TransactionUpdateRequest) -> EngineResult<TransactionResponse>;

    /// Records one payment.
    async fn pay_transaction(
        &self,
        code: &TransactionCode,
        request: &PaymentRequest,
    ) -> EngineResult<PaymentResponse>;

    /// Payments of a transaction, live and cancelled.
    async fn list_payments(
        &self,
        code: &TransactionCode,
        transaction_type: TransactionType,
    ) -> EngineResult<Vec<PaymentResponse>>;

    /// Cancels a transaction.
    async fn cancel_transaction(&self, request: &CancellationRequest) -> EngineResult<TransactionResponse>;

    /// Cancels one payment.
    async fn cancel_payment(
        &self,
        payment_id: &str,
        request: &CancellationRequest,
    ) -> EngineResult<PaymentResponse>;

    /// Creates a wallet trade.
    async fn trade_wallet(&self, request: &WalletTradeRequest) -> EngineResult<WalletTradingResponse>;

    /// Fetches one wallet.
    async fn get_wallet(&self, wallet_id: &WalletId) -> EngineResult<OfficeWalletResponse>;

    /// Trades of a wallet.
    async fn list_wallet_trades(&self, wallet_id: &WalletId) -> EngineResult<Vec<WalletTradingResponse>>;

    /// Fetches one trade.
    async fn get_trade(
        &self,
        wallet_id: &WalletId,
        code: &TransactionCode,
    ) -> EngineResult<WalletTradingResponse>;

    /// Corrects a trade. The request carries the code.
    async fn update_trade(&self, request: &WalletTradeRequest) -> EngineResult<WalletTradingResponse>;

    /// Records a trade review.
    async fn review_trade(
        &self,
        wallet_id: &WalletId,
        code: &TransactionCode,
        request: &TradeReviewRequest,
    ) -> EngineResult<WalletTradingResponse>;

    /// Commits a pending trade.
    async fn commit_trade(&self, request: &CommitTradeRequest) -> EngineResult<WalletTradingResponse>;

    /// Pays a pending trade from the FUND account.
    async fn pay_trade(
        &self,
        wallet_id: &WalletId,
        code: &TransactionCode,
        request: &PaymentRequest,
    ) -> EngineResult<WalletTradingResponse>;

    /// Rolls back a trade.
    async fn rollback_trade(
        &self,
        wallet_id: &WalletId,
        request: &TradeRollbackRequest,
    ) -> EngineResult<WalletTradingResponse>;

    /// Sets the partner-paid flag of a SELL trade.
    async fn update_partner_paid(
        &self,
        wallet_id: &WalletId,
        request: &PartnerPaidRequest,
    ) -> EngineResult<WalletTradingResponse>;

    /// Turns on partner balance tracking.
    async fn enable_balance_tracking(&self, wallet_id: &WalletId) -> EngineResult<OfficeWalletResponse>;

    /// Opens a ledger account.
    async fn open_account(&self, request: &OpenAccountRequest) -> EngineResult<AccountResponse>;

    /// Fetches one account.
    async fn get_account(&self, initials: &str) -> EngineResult<AccountResponse>;

    /// Updates an account if its version still matches.
    async fn update_account(&self, request: &UpdateAccountRequest) -> EngineResult<AccountResponse>;
}
