//! Request payloads sent to the accounting engine.
//!
//! Field names follow the engine's wire format. Identifiers the engine
//! assigns or looks up (account initials, transaction codes, wallet ids) are
//! carried as plain strings here and checked for length before dispatch.

use fxdesk_shared::types::{AssetCode, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::trading::TradingType;
use crate::workflow::types::{TransactionType, ValidationState};

/// An amount together with the rate it converts at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountWithRate {
    /// Amount in the transaction currency.
    pub amount: Decimal,
    /// Conversion rate.
    pub rate: Decimal,
}

impl AmountWithRate {
    /// Pairs an amount with its rate.
    #[must_use]
    pub const fn new(amount: Decimal, rate: Decimal) -> Self {
        Self { amount, rate }
    }
}

/// Outside customer named on a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CustomerDetails {
    /// Customer name.
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: String,
    /// Customer phone number.
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: String,
}

/// How a SENDING transaction reaches the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Cash pickup.
    Cash,
    /// Bank transfer.
    Bank,
    /// Mobile money.
    Mobile,
    /// Anything else.
    Other,
}

/// Channel of a FOREX transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForexTag {
    /// Alipay transfer.
    #[serde(rename = "ALI PAY")]
    AliPay,
    /// Telegraphic transfer in RMB.
    #[serde(rename = "TT RMB")]
    TtRmb,
    /// Bank telegraphic transfer quoted by the provider.
    #[serde(rename = "BANK TT")]
    BankTtQuoted,
    /// Bank telegraphic transfer with bank rate and fees.
    #[serde(rename = "BANKTT")]
    BankTt,
}

impl ForexTag {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AliPay => "ALI PAY",
            Self::TtRmb => "TT RMB",
            Self::BankTtQuoted => "BANK TT",
            Self::BankTt => "BANKTT",
        }
    }

    /// BANKTT amounts are already in the main currency and carry bank fields.
    #[must_use]
    pub fn is_bank_tt(&self) -> bool {
        matches!(self, Self::BankTt)
    }
}

impl fmt::Display for ForexTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transfer between two agent accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct InternalData {
    /// Debited account.
    #[validate(length(min = 1, max = 20, message = "Sender must be 1-20 characters"))]
    pub sender: String,
    /// Credited account.
    #[validate(length(min = 1, max = 20, message = "Receiver must be 1-20 characters"))]
    pub receiver: String,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Cash deposit into an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DepositData {
    /// Credited account.
    #[validate(length(min = 1, max = 20, message = "Receiver must be 1-20 characters"))]
    pub receiver: String,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Payout to an outside customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExternalData {
    /// Debited account.
    #[validate(length(min = 1, max = 20, message = "Sender must be 1-20 characters"))]
    pub sender: String,
    /// Customer receiving the payout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub customer: Option<CustomerDetails>,
    /// Currency the customer is paid in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_currency: Option<Currency>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Money sent through a payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SendingData {
    /// Receiving account initials.
    #[validate(length(min = 1, max = 20, message = "Receiver must be 1-20 characters"))]
    pub receiver_initials: String,
    /// Delivery channel.
    pub payment_method: PaymentMethod,
    /// Currency paid out.
    pub payment_currency: Currency,
}

/// Currency purchase through a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ForexData {
    /// Provider account.
    #[validate(length(min = 1, max = 20, message = "Provider must be 1-20 characters"))]
    pub provider_account: String,
    /// Customer account.
    #[validate(length(min = 1, max = 20, message = "Customer must be 1-20 characters"))]
    pub customer_account: String,
    /// Currency bought.
    pub currency: Currency,
    /// Office base currency.
    pub base_currency: Currency,
    /// Main to base rate.
    pub daily_rate: Decimal,
    /// Provider rate. For BANKTT this is the selling markup.
    pub buying_rate: Decimal,
    /// Customer rate. For BANKTT a percentage markup.
    pub selling_rate: Decimal,
    /// Amount in the bought currency.
    pub amount: Decimal,
    /// Bank rate, BANKTT only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_rate: Option<Decimal>,
    /// Flat bank fees in base currency, BANKTT only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_fees: Option<Decimal>,
    /// Channel.
    pub tag: ForexTag,
}

/// Type-specific part of a transaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum TransactionData {
    /// INTERNAL.
    Internal(InternalData),
    /// DEPOSIT.
    Deposit(DepositData),
    /// EXTERNAL.
    External(ExternalData),
    /// SENDING.
    Sending(SendingData),
    /// FOREX.
    Forex(ForexData),
}

impl TransactionData {
    /// The transaction type this payload creates.
    #[must_use]
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Internal(_) => TransactionType::Internal,
            Self::Deposit(_) => TransactionType::Deposit,
            Self::External(_) => TransactionType::External,
            Self::Sending(_) => TransactionType::Sending,
            Self::Forex(_) => TransactionType::Forex,
        }
    }
}

/// New transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TransactionRequest {
    /// Currency of the amount, when not the office main currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Amount and rate.
    pub amount: AmountWithRate,
    /// Charges and their rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charges: Option<AmountWithRate>,
    /// REQUEST note message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1024, message = "Message must be at most 1024 characters"))]
    pub message: Option<String>,
    /// Must agree with `data`.
    pub transaction_type: TransactionType,
    /// Type-specific fields.
    pub data: TransactionData,
}

impl TransactionRequest {
    /// Builds a request whose type is taken from the payload.
    #[must_use]
    pub fn new(amount: AmountWithRate, charges: Option<AmountWithRate>, data: TransactionData) -> Self {
        Self {
            currency: None,
            amount,
            charges,
            message: None,
            transaction_type: data.transaction_type(),
            data,
        }
    }

    /// Sets the REQUEST note message. Blank messages are dropped.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.trim().is_empty()).then_some(message);
        self
    }

    /// Sets the amount currency.
    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }
}

/// Reviewer decision on a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TransactionReviewRequest {
    /// Transaction code.
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: String,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Outcome.
    pub state: ValidationState,
    /// Reviewer comments. Required unless approving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1024, message = "Notes must be at most 1024 characters"))]
    pub notes: Option<String>,
}

/// Amount correction of a Review or Rejected transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TransactionUpdateRequest {
    /// Transaction code.
    #[serde(skip)]
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: String,
    /// Amount currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Corrected amount and rate.
    pub amount: AmountWithRate,
    /// Corrected charges.
    pub charges: AmountWithRate,
}

/// Payment against a pending transaction, or cash settlement of a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PaymentRequest {
    /// Amount paid.
    pub amount: Decimal,
    /// Rate of the payment.
    pub rate: Decimal,
    /// Type of the paid transaction.
    pub payment_type: TransactionType,
    /// Customer receiving the money.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub customer: Option<CustomerDetails>,
    /// PAYMENT note message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1024, message = "Notes must be at most 1024 characters"))]
    pub notes: Option<String>,
}

/// One entry of a grouped FOREX payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedPaymentItem {
    /// Transaction code.
    pub code: String,
    /// Payment for that code.
    pub request: PaymentRequest,
}

/// Cancellation of a transaction or of one of its payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CancellationRequest {
    /// Transaction code.
    #[validate(length(min = 1, max = 20, message = "Code must be 1-20 characters"))]
    pub code: String,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Selected reasons.
    pub reason: Vec<String>,
    /// Free-text description.
    #[validate(length(max = 265, message = "Description must be at most 265 characters"))]
    pub description: String,
}

impl CancellationRequest {
    /// Reasons joined for the CANCELLATION note.
    #[must_use]
    pub fn reason_text(&self) -> String {
        self.reason
            .iter()
            .map(|reason| reason.trim())
            .filter(|reason| !reason.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Type-specific part of a wallet trade request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request_type")]
pub enum TradeRequestKind {
    /// BUY from a provider.
    #[serde(rename = "BUY")]
    Buy {
        /// Provider account.
        provider: String,
    },
    /// SELL or SIMPLE SELL to a customer.
    #[serde(rename = "SELL")]
    Sell {
        /// Customer account.
        customer: String,
        /// Currency the customer pays in.
        currency: AssetCode,
    },
    /// EXCHANGE into another wallet.
    #[serde(rename = "EXCHANGE")]
    Exchange {
        /// Rate to the target wallet.
        exchange_rate: Decimal,
        /// Target wallet.
        #[serde(rename = "walletID")]
        wallet_id: String,
    },
    /// EXCHANGE WITH SIMPLE WALLET.
    #[serde(rename = "EXCHANGE WITH SIMPLE WALLET")]
    ExchangeWithSimpleWallet {
        /// Target simple wallet.
        #[serde(rename = "walletID")]
        wallet_id: String,
        /// Cross rate.
        exchange_rate: Decimal,
        /// Rate the target sells at.
        selling_rate: Decimal,
    },
    /// DEPOSIT from a provider.
    #[serde(rename = "DEPOSIT")]
    Deposit {
        /// Provider account.
        provider: String,
    },
}

impl TradeRequestKind {
    /// True when this payload can accompany `trading_type`.
    #[must_use]
    pub fn matches(&self, trading_type: TradingType) -> bool {
        matches!(
            (self, trading_type),
            (Self::Buy { .. }, TradingType::Buy)
                | (Self::Sell { .. }, TradingType::Sell | TradingType::SimpleSell)
                | (Self::Exchange { .. }, TradingType::Exchange)
                | (
                    Self::ExchangeWithSimpleWallet { .. },
                    TradingType::ExchangeWithSimpleWallet
                )
                | (Self::Deposit { .. }, TradingType::Deposit)
        )
    }
}

/// New wallet trade, or a correction when `code` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct WalletTradeRequest {
    /// Existing trade code when editing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Source wallet.
    #[serde(rename = "walletID")]
    #[validate(length(min = 1, max = 20, message = "Wallet must be 1-20 characters"))]
    pub wallet_id: String,
    /// Wallet trading currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_currency: Option<AssetCode>,
    /// Cross currency for exchanges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_currency: Option<AssetCode>,
    /// Currency sold for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_currency: Option<AssetCode>,
    /// Trade kind.
    pub trading_type: TradingType,
    /// Amount in the wallet asset or trading currency.
    pub amount: Decimal,
    /// Main to base rate.
    pub daily_rate: Decimal,
    /// Trade rate.
    pub trading_rate: Decimal,
    /// REQUEST note message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1024, message = "Message must be at most 1024 characters"))]
    pub message: Option<String>,
    /// Type-specific fields.
    pub request: TradeRequestKind,
}

/// Reviewer decision on a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReviewRequest {
    /// Outcome.
    pub review: ValidationState,
    /// Review tags. Required unless approving.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Commit of a pending trade, alone or as part of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitTradeRequest {
    /// Wallet the trade belongs to.
    #[serde(rename = "walletID")]
    pub wallet_id: String,
    /// Trade id.
    #[serde(rename = "tradeID")]
    pub trade_id: String,
    /// Trade code, sent in grouped commits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Trade rate.
    pub trading_rate: Decimal,
    /// Trade amount.
    pub amount: Decimal,
    /// Cost basis.
    pub trading_cost: Decimal,
    /// Sale proceeds.
    pub sold_amount: Decimal,
    /// Held-asset units.
    pub crypto_amount: Decimal,
    /// `sold_amount - trading_cost`.
    pub trading_result: Decimal,
}

/// Partner-paid flag of a SELL trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerPaidRequest {
    /// Trade code.
    pub code: String,
    /// New flag value.
    pub partner_paid: bool,
}

/// Rollback of a pending or paid trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRollbackRequest {
    /// Trade code.
    pub code: String,
    /// Why the trade is rolled back.
    pub reason: String,
}

/// Kind of ledger account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Agent account.
    Agent,
    /// Supplier account.
    Supplier,
    /// Office account.
    Office,
    /// Fund account used for trade cash settlement.
    Fund,
}

/// New ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OpenAccountRequest {
    /// Account kind.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Account currency.
    pub currency: Currency,
    /// Unique initials.
    #[validate(length(min = 1, max = 6, message = "Initials must be 1-6 characters"))]
    pub initials: String,
    /// Opening balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    /// Owning agent.
    #[validate(length(min = 1, max = 20, message = "Owner must be 1-20 characters"))]
    pub owner_initials: String,
}

/// Account change guarded by the version the caller read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    /// Account initials.
    #[validate(length(min = 1, max = 6, message = "Initials must be 1-6 characters"))]
    pub initials: String,
    /// Open or close the account.
    pub is_open: bool,
    /// Version read before the change.
    pub version: u32,
}
