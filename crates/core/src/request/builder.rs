//! Turns converter quotes and commit figures into engine requests.

use fxdesk_shared::types::{AssetCode, Currency, TransactionCode, WalletId};
use rust_decimal::Decimal;

use super::types::{
    AmountWithRate, CommitTradeRequest, CustomerDetails, ForexData, ForexTag, GroupedPaymentItem,
    PaymentRequest, TradeRequestKind, TransactionData, TransactionRequest, WalletTradeRequest,
};
use crate::conversion::guard::safe_div;
use crate::conversion::{
    BankTtQuote, BuyQuote, DepositQuote, ExchangeQuote, ForexQuote, SellQuote,
    SimpleExchangeQuote, TransferQuote,
};
use crate::trading::{TradeCommit, TradingType};
use crate::workflow::notes::NoteTrail;
use crate::workflow::types::TransactionType;

/// Accounts and currencies of a FOREX transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForexParties {
    /// Provider account initials.
    pub provider_account: String,
    /// Customer account initials.
    pub customer_account: String,
    /// Currency bought.
    pub currency: Currency,
    /// Office base currency.
    pub base_currency: Currency,
}

/// INTERNAL, DEPOSIT, SENDING or EXTERNAL request from a transfer quote.
#[must_use]
pub fn transfer_request(quote: &TransferQuote, data: TransactionData) -> TransactionRequest {
    TransactionRequest::new(
        AmountWithRate::new(quote.amount, quote.rate),
        Some(AmountWithRate::new(quote.charges, quote.rate)),
        data,
    )
}

/// BANKTT request.
///
/// The selling markup is sent as both buying and selling rate, and the
/// amount is carried at the daily rate with zero charges.
#[must_use]
pub fn bank_tt_request(parties: ForexParties, quote: &BankTtQuote) -> TransactionRequest {
    let data = ForexData {
        provider_account: parties.provider_account,
        customer_account: parties.customer_account,
        currency: parties.currency,
        base_currency: parties.base_currency,
        daily_rate: quote.daily_rate,
        buying_rate: quote.selling_rate,
        selling_rate: quote.selling_rate,
        amount: quote.amount,
        bank_rate: Some(quote.bank_rate),
        bank_fees: Some(quote.bank_fees),
        tag: ForexTag::BankTt,
    };
    forex_envelope(quote.amount, quote.daily_rate, data)
}

/// Provider-quoted FOREX request (ALI PAY, TT RMB, BANK TT).
#[must_use]
pub fn forex_request(parties: ForexParties, quote: &ForexQuote, tag: ForexTag) -> TransactionRequest {
    let data = ForexData {
        provider_account: parties.provider_account,
        customer_account: parties.customer_account,
        currency: parties.currency,
        base_currency: parties.base_currency,
        daily_rate: quote.daily_rate,
        buying_rate: quote.buying_rate,
        selling_rate: quote.selling_rate,
        amount: quote.amount,
        bank_rate: None,
        bank_fees: None,
        tag,
    };
    forex_envelope(quote.amount, quote.daily_rate, data)
}

fn forex_envelope(amount: Decimal, daily_rate: Decimal, data: ForexData) -> TransactionRequest {
    TransactionRequest::new(
        AmountWithRate::new(amount, daily_rate),
        Some(AmountWithRate::new(Decimal::ZERO, daily_rate)),
        TransactionData::Forex(data),
    )
}

/// A pending FOREX transaction offered for grouped payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingForex {
    /// Transaction code.
    pub code: TransactionCode,
    /// Transaction amount.
    pub amount: Decimal,
    /// Transaction rate.
    pub rate: Decimal,
    /// Provider rate.
    pub buying_rate: Decimal,
    /// Channel.
    pub tag: ForexTag,
    /// Audit trail.
    pub notes: NoteTrail,
}

impl PendingForex {
    /// Amount to pay: BANKTT amounts as is, others converted at the buying rate.
    #[must_use]
    pub fn payment(&self) -> Decimal {
        if self.tag.is_bank_tt() {
            self.amount
        } else {
            safe_div(self.amount, self.buying_rate)
        }
    }
}

/// Sum of the payments of a grouped payment.
#[must_use]
pub fn grouped_payment_total(rows: &[PendingForex]) -> Decimal {
    rows.iter().map(PendingForex::payment).sum()
}

/// One payment per row, all for the same customer.
///
/// Each payment carries the message of the row's REQUEST note.
#[must_use]
pub fn grouped_payment(rows: &[PendingForex], customer: &CustomerDetails) -> Vec<GroupedPaymentItem> {
    rows.iter()
        .map(|row| {
            let message = row.notes.request_message();
            GroupedPaymentItem {
                code: row.code.to_string(),
                request: PaymentRequest {
                    amount: row.payment(),
                    rate: row.rate,
                    payment_type: TransactionType::Forex,
                    customer: Some(customer.clone()),
                    notes: (!message.is_empty()).then(|| message.to_string()),
                },
            }
        })
        .collect()
}

fn trade(
    wallet_id: &WalletId,
    trading_type: TradingType,
    amount: Decimal,
    daily_rate: Decimal,
    trading_rate: Decimal,
    request: TradeRequestKind,
) -> WalletTradeRequest {
    WalletTradeRequest {
        code: None,
        wallet_id: wallet_id.to_string(),
        trading_currency: None,
        exchange_currency: None,
        selling_currency: None,
        trading_type,
        amount,
        daily_rate,
        trading_rate,
        message: None,
        request,
    }
}

/// BUY trade.
#[must_use]
pub fn buy_trade(wallet_id: &WalletId, quote: &BuyQuote, provider: &str) -> WalletTradeRequest {
    trade(
        wallet_id,
        TradingType::Buy,
        quote.amount,
        quote.daily_rate,
        quote.trading_rate,
        TradeRequestKind::Buy {
            provider: provider.to_string(),
        },
    )
}

/// SELL trade, or SIMPLE SELL from a simple wallet.
#[must_use]
pub fn sell_trade(
    wallet_id: &WalletId,
    quote: &SellQuote,
    simple_wallet: bool,
    customer: &str,
) -> WalletTradeRequest {
    let trading_type = if simple_wallet {
        TradingType::SimpleSell
    } else {
        TradingType::Sell
    };
    let mut request = trade(
        wallet_id,
        trading_type,
        quote.amount,
        quote.daily_rate,
        quote.trading_rate,
        TradeRequestKind::Sell {
            customer: customer.to_string(),
            currency: quote.selling_currency,
        },
    );
    request.trading_currency = Some(quote.trading_currency);
    request.selling_currency = Some(quote.selling_currency);
    request
}

/// EXCHANGE trade into `target`. A missing exchange rate is sent as zero and
/// fails validation.
#[must_use]
pub fn exchange_trade(wallet_id: &WalletId, quote: &ExchangeQuote, target: &WalletId) -> WalletTradeRequest {
    trade(
        wallet_id,
        TradingType::Exchange,
        quote.legs.amount,
        quote.legs.daily_rate,
        quote.legs.trading_rate,
        TradeRequestKind::Exchange {
            exchange_rate: quote.exchange_rate.unwrap_or_default(),
            wallet_id: target.to_string(),
        },
    )
}

/// EXCHANGE WITH SIMPLE WALLET trade into `target`.
#[must_use]
pub fn simple_exchange_trade(
    wallet_id: &WalletId,
    quote: &SimpleExchangeQuote,
    target: &WalletId,
    exchange_currency: AssetCode,
) -> WalletTradeRequest {
    let mut request = trade(
        wallet_id,
        TradingType::ExchangeWithSimpleWallet,
        quote.amount,
        quote.daily_rate,
        quote.trading_rate,
        TradeRequestKind::ExchangeWithSimpleWallet {
            wallet_id: target.to_string(),
            exchange_rate: quote.exchange_rate,
            selling_rate: quote.selling_rate,
        },
    );
    request.exchange_currency = Some(exchange_currency);
    request
}

/// DEPOSIT trade. The deposit rate travels as the trading rate.
#[must_use]
pub fn deposit_trade(wallet_id: &WalletId, quote: &DepositQuote, provider: &str) -> WalletTradeRequest {
    trade(
        wallet_id,
        TradingType::Deposit,
        quote.amount,
        quote.daily_rate,
        quote.rate,
        TradeRequestKind::Deposit {
            provider: provider.to_string(),
        },
    )
}

impl WalletTradeRequest {
    /// Sets the REQUEST note message. Blank messages are dropped.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.message = (!message.trim().is_empty()).then_some(message);
        self
    }

    /// Turns the request into a correction of an existing trade.
    #[must_use]
    pub fn editing(mut self, code: &TransactionCode) -> Self {
        self.code = Some(code.to_string());
        self
    }
}

/// Commit request for one trade.
#[must_use]
pub fn commit_request(wallet_id: &WalletId, trade_id: &str, commit: &TradeCommit) -> CommitTradeRequest {
    CommitTradeRequest {
        wallet_id: wallet_id.to_string(),
        trade_id: trade_id.to_string(),
        code: None,
        trading_rate: commit.trading_rate,
        amount: commit.amount,
        trading_cost: commit.trading_cost,
        sold_amount: commit.sold_amount,
        crypto_amount: commit.crypto_amount,
        trading_result: commit.trading_result,
    }
}

/// Commit request inside a grouped commit, identified by code.
#[must_use]
pub fn grouped_commit_request(
    wallet_id: &WalletId,
    trade_id: &str,
    code: &TransactionCode,
    commit: &TradeCommit,
) -> CommitTradeRequest {
    CommitTradeRequest {
        code: Some(code.to_string()),
        ..commit_request(wallet_id, trade_id, commit)
    }
}

/// Cash settlement of a trade from the FUND account, at the daily rate.
#[must_use]
pub fn trade_payment(amount: Decimal, daily_rate: Decimal, notes: &str) -> PaymentRequest {
    PaymentRequest {
        amount,
        rate: daily_rate,
        payment_type: TransactionType::Forex,
        customer: None,
        notes: (!notes.trim().is_empty()).then(|| notes.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{BankTtEdit, TransferEdit, WalletEdit};
    use crate::request::types::InternalData;
    use crate::request::validation::RequestCheck;
    use crate::trading::{WalletBalances, WalletKind};
    use crate::workflow::notes::{Note, NoteKind};
    use fxdesk_shared::types::{CryptoCurrency, UserId};
    use rust_decimal_macros::dec;

    fn parties() -> ForexParties {
        ForexParties {
            provider_account: "BNK".to_string(),
            customer_account: "CUS".to_string(),
            currency: Currency::Usd,
            base_currency: Currency::Aed,
        }
    }

    #[test]
    fn test_transfer_request() {
        let quote = TransferQuote::new(dec!(3.67))
            .apply(TransferEdit::ChargePercentage(dec!(1)))
            .apply(TransferEdit::Amount(dec!(100)));
        let request = transfer_request(
            &quote,
            TransactionData::Internal(InternalData {
                sender: "A1".to_string(),
                receiver: "A2".to_string(),
                tags: vec![],
            }),
        );
        assert_eq!(request.transaction_type, TransactionType::Internal);
        assert_eq!(request.amount, AmountWithRate::new(dec!(100), dec!(3.67)));
        assert_eq!(request.charges, Some(AmountWithRate::new(dec!(1), dec!(3.67))));
        assert!(request.check().is_ok());
    }

    #[test]
    fn test_bank_tt_request() {
        let quote = BankTtQuote::new(dec!(3.67))
            .apply(BankTtEdit::BankRate(dec!(3.65)))
            .apply(BankTtEdit::BankFees(dec!(20)))
            .apply(BankTtEdit::SellingRate(dec!(2)))
            .apply(BankTtEdit::Amount(dec!(1000)));
        let request = bank_tt_request(parties(), &quote);

        assert_eq!(request.amount, AmountWithRate::new(dec!(1000), dec!(3.67)));
        assert_eq!(request.charges, Some(AmountWithRate::new(dec!(0), dec!(3.67))));
        let TransactionData::Forex(data) = &request.data else {
            panic!("expected forex data");
        };
        assert_eq!(data.tag, ForexTag::BankTt);
        assert_eq!(data.buying_rate, dec!(2));
        assert_eq!(data.selling_rate, dec!(2));
        assert_eq!(data.bank_rate, Some(dec!(3.65)));
        assert_eq!(data.bank_fees, Some(dec!(20)));
        assert!(request.check().is_ok());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["data"]["type"], "FOREX");
        assert_eq!(json["data"]["tag"], "BANKTT");
    }

    fn pending(code: &str, amount: Decimal, buying_rate: Decimal, tag: ForexTag) -> PendingForex {
        let mut notes = NoteTrail::default();
        notes.append(Note::new(NoteKind::Request, format!("order {code}"), UserId::new()));
        PendingForex {
            code: TransactionCode::from(code),
            amount,
            rate: dec!(3.67),
            buying_rate,
            tag,
            notes,
        }
    }

    #[test]
    fn test_grouped_payment_items() {
        let rows = vec![
            pending("F1", dec!(1020), dec!(2), ForexTag::BankTt),
            pending("F2", dec!(700), dec!(7), ForexTag::AliPay),
            pending("F3", dec!(700), dec!(0), ForexTag::TtRmb),
        ];
        let customer = CustomerDetails {
            name: "Ada".to_string(),
            phone: "555".to_string(),
        };
        let items = grouped_payment(&rows, &customer);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].request.amount, dec!(1020));
        assert_eq!(items[1].request.amount, dec!(100));
        assert_eq!(items[2].request.amount, dec!(0));
        assert_eq!(items[1].code, "F2");
        assert_eq!(items[1].request.notes.as_deref(), Some("order F2"));
        assert_eq!(items[1].request.payment_type, TransactionType::Forex);
        assert_eq!(grouped_payment_total(&rows), dec!(1120));
    }

    #[test]
    fn test_sell_trade_carries_currencies() {
        let quote = SellQuote::new(
            AssetCode::Fiat(Currency::Aed),
            AssetCode::Fiat(Currency::Aed),
            dec!(3.67),
        )
        .apply(WalletEdit::TradingRate(dec!(3.7)))
        .apply(WalletEdit::Amount(dec!(370)));
        let request = sell_trade(&WalletId::from("W1"), &quote, true, "CUS");

        assert_eq!(request.trading_type, TradingType::SimpleSell);
        assert_eq!(request.selling_currency, Some(AssetCode::Fiat(Currency::Aed)));
        assert!(request.check().is_ok());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["walletID"], "W1");
        assert_eq!(json["trading_type"], "SIMPLE SELL");
        assert_eq!(json["request"]["request_type"], "SELL");
    }

    #[test]
    fn test_exchange_without_rate_fails_validation() {
        let quote = ExchangeQuote::new(dec!(3.67), dec!(3.7)).apply(WalletEdit::Amount(dec!(1)));
        let request = exchange_trade(&WalletId::from("W1"), &quote, &WalletId::from("W2"));
        assert!(request.check().unwrap_err().has("request.exchange_rate"));

        let quote = quote.with_exchange_rate(Some(dec!(0.98)));
        let request = exchange_trade(&WalletId::from("W1"), &quote, &WalletId::from("W2"))
            .with_message("rebalance");
        assert!(request.check().is_ok());
        assert_eq!(request.message.as_deref(), Some("rebalance"));
    }

    #[test]
    fn test_deposit_and_edit() {
        let quote = DepositQuote::new(WalletKind::Simple, dec!(3.67))
            .apply(WalletEdit::TradingRate(dec!(2)))
            .apply(WalletEdit::Amount(dec!(500)));
        let request = deposit_trade(&WalletId::from("W1"), &quote, "PRV")
            .editing(&TransactionCode::from("TRD-9"));
        assert_eq!(request.trading_rate, dec!(2));
        assert_eq!(request.code.as_deref(), Some("TRD-9"));
    }

    #[test]
    fn test_buy_and_simple_exchange() {
        let quote = BuyQuote::new(dec!(3.67), dec!(3.7)).apply(WalletEdit::Amount(dec!(10)));
        let request = buy_trade(&WalletId::from("W1"), &quote, "PRV");
        assert!(request.check().is_ok());

        let mut quote = SimpleExchangeQuote::new(dec!(3.67));
        quote.exchange_rate = dec!(1.1);
        quote.trading_rate = dec!(1);
        quote.amount = dec!(5);
        let request = simple_exchange_trade(
            &WalletId::from("W1"),
            &quote,
            &WalletId::from("W3"),
            AssetCode::Crypto(CryptoCurrency::Usdt),
        );
        assert_eq!(request.exchange_currency, Some(AssetCode::Crypto(CryptoCurrency::Usdt)));
        assert!(request.check().is_ok());
    }

    #[test]
    fn test_commit_requests() {
        let wallet = WalletBalances::new(dec!(2), dec!(4000), dec!(1000));
        let commit = TradeCommit::compute(&wallet, TradingType::Sell, dec!(400), dec!(3.2));
        let single = commit_request(&WalletId::from("W1"), "42", &commit);
        assert_eq!(single.code, None);
        assert_eq!(single.trading_result, dec!(25));

        let grouped =
            grouped_commit_request(&WalletId::from("W1"), "42", &TransactionCode::from("T1"), &commit);
        assert_eq!(grouped.code.as_deref(), Some("T1"));
        let json = serde_json::to_value(&grouped).unwrap();
        assert_eq!(json["tradeID"], "42");
    }

    #[test]
    fn test_trade_payment() {
        let payment = trade_payment(dec!(1020), dec!(3.67), " ");
        assert_eq!(payment.rate, dec!(3.67));
        assert_eq!(payment.payment_type, TransactionType::Forex);
        assert_eq!(payment.notes, None);
    }
}
