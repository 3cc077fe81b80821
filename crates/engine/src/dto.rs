//! Engine responses.
//!
//! These mirror what the engine stores. Everything here is authoritative;
//! the desk only reads it to run its guards before sending the next request.

use chrono::{DateTime, Utc};
use fxdesk_core::conversion::safe_div;
use fxdesk_core::request::{AccountType, ForexTag, PendingForex};
use fxdesk_core::trading::{TradeSummary, TradingType, WalletBalances, WalletKind};
use fxdesk_core::workflow::{
    NoteError, NoteTrail, PaymentEntry, PaymentState, TradeSnapshot, TransactionState,
    TransactionType,
};
use fxdesk_shared::types::{AssetCode, Currency, TransactionCode, WalletId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A transaction as stored by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Transaction code.
    pub code: TransactionCode,
    /// Transaction type.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Current state.
    pub state: TransactionState,
    /// Amount.
    pub amount: Decimal,
    /// Rate.
    #[serde(default)]
    pub rate: Decimal,
    /// Charges, when the type has any.
    #[serde(default)]
    pub charges: Option<Decimal>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Raw notes JSON.
    #[serde(default)]
    pub notes: Option<String>,
    /// FOREX provider rate.
    #[serde(default)]
    pub buying_rate: Option<Decimal>,
    /// FOREX channel.
    #[serde(default)]
    pub tag: Option<ForexTag>,
}

impl TransactionResponse {
    /// Parsed audit trail.
    pub fn note_trail(&self) -> Result<NoteTrail, NoteError> {
        NoteTrail::parse(self.notes.as_deref().unwrap_or_default())
    }

    /// Amount owed in payment units.
    ///
    /// FOREX amounts are in the bought currency and are converted at the
    /// buying rate, except BANKTT which is already in the main currency.
    #[must_use]
    pub fn payable_amount(&self) -> Decimal {
        match (self.transaction_type, self.tag) {
            (TransactionType::Forex, Some(tag)) if !tag.is_bank_tt() => {
                safe_div(self.amount, self.buying_rate.unwrap_or_default())
            }
            _ => self.amount,
        }
    }

    /// The transaction as a grouped-payment row, if it is a pending FOREX.
    pub fn pending_forex(&self) -> Result<Option<PendingForex>, NoteError> {
        let (TransactionType::Forex, TransactionState::Pending, Some(tag)) =
            (self.transaction_type, self.state, self.tag)
        else {
            return Ok(None);
        };
        Ok(Some(PendingForex {
            code: self.code.clone(),
            amount: self.amount,
            rate: self.rate,
            buying_rate: self.buying_rate.unwrap_or_default(),
            tag,
            notes: self.note_trail()?,
        }))
    }
}

/// A payment sub-record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    /// Payment id.
    pub id: String,
    /// Amount paid.
    pub amount: Decimal,
    /// 1 paid, 2 cancelled.
    pub state: PaymentState,
    /// Type of the paid transaction.
    pub transaction_type: TransactionType,
    /// Payment time.
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
    /// Payer.
    #[serde(default)]
    pub paid_by: Option<String>,
    /// Raw notes JSON.
    #[serde(default)]
    pub notes: Option<String>,
}

impl PaymentResponse {
    /// View used by the settlement rules.
    #[must_use]
    pub fn entry(&self) -> PaymentEntry {
        PaymentEntry {
            amount: self.amount,
            state: self.state,
        }
    }
}

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    /// Account kind.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Account currency.
    pub currency: Currency,
    /// Unique initials.
    pub initials: String,
    /// Current balance.
    pub balance: Decimal,
    /// Whether the account accepts movements.
    pub is_open: bool,
    /// Optimistic-concurrency token.
    pub version: u32,
}

/// An office trading wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeWalletResponse {
    /// Wallet id.
    #[serde(rename = "walletID")]
    pub wallet_id: WalletId,
    /// Wallet kind.
    pub wallet_type: WalletKind,
    /// Display name.
    #[serde(default)]
    pub wallet_name: Option<String>,
    /// Held asset.
    pub crypto_currency: AssetCode,
    /// Currency the wallet trades in.
    pub trading_currency: AssetCode,
    /// Units of the held asset.
    pub crypto_balance: Decimal,
    /// Balance in the trading currency.
    pub trading_balance: Decimal,
    /// USD valuation.
    pub value: Decimal,
    /// Balance owed by or to the partner.
    #[serde(default)]
    pub partner_balance: Decimal,
    /// Partner balance tracking flag.
    #[serde(default)]
    pub balance_tracking_enabled: bool,
}

impl OfficeWalletResponse {
    /// Balances used by the commit math.
    #[must_use]
    pub fn balances(&self) -> WalletBalances {
        WalletBalances::new(self.crypto_balance, self.trading_balance, self.value)
    }
}

/// A wallet trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTradingResponse {
    /// Trade id.
    pub id: String,
    /// Trade code.
    pub code: TransactionCode,
    /// Source wallet.
    #[serde(rename = "walletID")]
    pub wallet_id: WalletId,
    /// Trade kind.
    pub trading_type: TradingType,
    /// Amount.
    pub amount: Decimal,
    /// Daily rate at request time.
    pub daily_rate: Decimal,
    /// Trade rate.
    pub trading_rate: Decimal,
    /// Current state.
    pub state: TransactionState,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Booked cost basis.
    #[serde(default)]
    pub trading_cost: Decimal,
    /// Booked result.
    #[serde(default)]
    pub trading_result: Decimal,
    /// Rate to the target wallet.
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
    /// Selling rate of a simple-wallet exchange.
    #[serde(default)]
    pub selling_rate: Option<Decimal>,
    /// Target wallet of an exchange.
    #[serde(default, rename = "exchange_walletID")]
    pub exchange_wallet_id: Option<WalletId>,
    /// Partner settlement milestone of SELL trades.
    #[serde(default)]
    pub partner_paid: bool,
    /// Raw notes JSON.
    #[serde(default)]
    pub notes: Option<String>,
}

impl WalletTradingResponse {
    /// Fields the trade workflow checks.
    #[must_use]
    pub fn snapshot(&self) -> TradeSnapshot {
        TradeSnapshot {
            state: self.state,
            trading_type: self.trading_type,
            amount: self.amount,
            daily_rate: self.daily_rate,
            trading_rate: self.trading_rate,
        }
    }

    /// Fields the grouped commit selection needs. Undated trades sort first.
    #[must_use]
    pub fn summary(&self) -> TradeSummary {
        TradeSummary {
            code: self.code.clone(),
            amount: self.amount,
            state: self.state,
            created_at: self.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

/// Outcome of one item of a batch: 1 succeeded, 0 failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    /// Transaction or trade code.
    pub code: String,
    /// 1 or 0.
    pub state: u8,
}

impl ItemState {
    /// Success marker.
    pub const SUCCEEDED: u8 = 1;
    /// Failure marker.
    pub const FAILED: u8 = 0;

    /// True for a successful item.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.state == Self::SUCCEEDED
    }
}
