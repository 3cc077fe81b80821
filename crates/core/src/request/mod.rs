//! Engine request payloads, their validation and the builders that fill
//! them from quotes.
//!
//! # Modules
//!
//! - `types` - Request payloads in the engine's wire format
//! - `validation` - Field-path keyed checks run before dispatch
//! - `builder` - Quotes and commit figures to requests

pub mod builder;
pub mod types;
pub mod validation;

pub use builder::{
    ForexParties, PendingForex, bank_tt_request, buy_trade, commit_request, deposit_trade,
    exchange_trade, forex_request, grouped_commit_request, grouped_payment, grouped_payment_total,
    sell_trade, simple_exchange_trade, trade_payment, transfer_request,
};
pub use types::{
    AccountType, AmountWithRate, CancellationRequest, CommitTradeRequest, CustomerDetails,
    DepositData, ExternalData, ForexData, ForexTag, GroupedPaymentItem, InternalData,
    OpenAccountRequest, PartnerPaidRequest, PaymentMethod, PaymentRequest, SendingData,
    TradeRequestKind, TradeReviewRequest, TradeRollbackRequest, TransactionData,
    TransactionRequest, TransactionReviewRequest, TransactionUpdateRequest, UpdateAccountRequest,
    WalletTradeRequest,
};
pub use validation::{FieldError, RequestCheck, ValidationFailure};
