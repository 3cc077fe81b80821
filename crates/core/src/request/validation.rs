//! Request validation before dispatch.
//!
//! Length rules come from the `validator` derives on the payloads. Numeric
//! and cross-field rules are checked here. Every failure is reported with the
//! dotted path of the offending field so it can be shown next to that field.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::types::{
    AmountWithRate, CancellationRequest, ForexData, GroupedPaymentItem, OpenAccountRequest,
    PaymentRequest, TradeRequestKind, TradeReviewRequest, TransactionData, TransactionRequest,
    TransactionReviewRequest, TransactionUpdateRequest, UpdateAccountRequest, WalletTradeRequest,
};
use crate::workflow::types::ValidationState;

/// A message attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted field path, e.g. `data.sender`.
    pub path: String,
    /// What is wrong.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A request rejected before it reached the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    /// Summary shown to the user.
    pub message: String,
    /// Per-field errors.
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        "VALIDATION_FAILED"
    }

    /// True if `path` has at least one error.
    #[must_use]
    pub fn has(&self, path: &str) -> bool {
        self.errors.iter().any(|error| error.path == path)
    }
}

/// Checks run on a request before it is sent.
pub trait RequestCheck {
    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns every failed rule at once.
    fn check(&self) -> Result<(), ValidationFailure>;
}

/// Collects field errors from several rules.
#[derive(Debug, Default)]
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn derived(&mut self, prefix: &str, result: Result<(), ValidationErrors>) {
        if let Err(errors) = result {
            let mut found = Vec::new();
            flatten(prefix, &errors, &mut found);
            found.sort_by(|a, b| a.path.cmp(&b.path));
            self.errors.extend(found);
        }
    }

    fn positive(&mut self, path: &str, value: Decimal) {
        if value <= Decimal::ZERO {
            self.errors
                .push(FieldError::new(path, "Must be greater than zero"));
        }
    }

    fn non_negative(&mut self, path: &str, value: Decimal) {
        if value.is_sign_negative() && !value.is_zero() {
            self.errors.push(FieldError::new(path, "Must not be negative"));
        }
    }

    fn not_blank(&mut self, path: &str, value: &str) {
        if value.trim().is_empty() {
            self.errors.push(FieldError::new(path, "This field is required"));
        }
    }

    fn require(&mut self, ok: bool, path: &str, message: &str) {
        if !ok {
            self.errors.push(FieldError::new(path, message));
        }
    }

    fn amount_with_rate(&mut self, prefix: &str, value: &AmountWithRate) {
        self.positive(&join(prefix, "amount"), value.amount);
        self.positive(&join(prefix, "rate"), value.rate);
    }

    fn finish(self, message: &str) -> Result<(), ValidationFailure> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ValidationFailure {
            message: message.to_string(),
            errors: self.errors,
        })
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn flatten(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = join(prefix, &field.to_string());
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    let message = error
                        .message
                        .as_deref()
                        .map_or_else(|| error.code.to_string(), str::to_string);
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(&join(&path, &index.to_string()), inner, out);
                }
            }
        }
    }
}

fn check_forex(checks: &mut Checks, data: &ForexData) {
    checks.derived("data", data.validate());
    checks.not_blank("data.provider_account", &data.provider_account);
    checks.not_blank("data.customer_account", &data.customer_account);
    checks.positive("data.daily_rate", data.daily_rate);
    checks.positive("data.buying_rate", data.buying_rate);
    checks.positive("data.selling_rate", data.selling_rate);
    checks.positive("data.amount", data.amount);
    if let Some(rate) = data.bank_rate {
        checks.non_negative("data.bank_rate", rate);
    }
    if let Some(fees) = data.bank_fees {
        checks.non_negative("data.bank_fees", fees);
    }
    if data.tag.is_bank_tt() {
        checks.require(
            data.bank_rate.is_some() == data.bank_fees.is_some(),
            "data.bank_fees",
            "Bank rate and bank fees go together",
        );
    } else {
        checks.require(
            data.bank_rate.is_none() && data.bank_fees.is_none(),
            "data.tag",
            "Bank rate and fees are only used with BANKTT",
        );
    }
}

impl RequestCheck for TransactionRequest {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.derived("", self.validate());
        checks.amount_with_rate("amount", &self.amount);
        if let Some(charges) = &self.charges {
            checks.non_negative("charges.amount", charges.amount);
            checks.non_negative("charges.rate", charges.rate);
        }
        checks.require(
            self.transaction_type == self.data.transaction_type(),
            "transaction_type",
            "Does not match the transaction data",
        );

        match &self.data {
            TransactionData::Internal(data) => {
                checks.derived("data", data.validate());
                checks.not_blank("data.sender", &data.sender);
                checks.not_blank("data.receiver", &data.receiver);
                checks.require(
                    data.sender.trim() != data.receiver.trim(),
                    "data.receiver",
                    "Sender and receiver must differ",
                );
            }
            TransactionData::Deposit(data) => {
                checks.derived("data", data.validate());
                checks.not_blank("data.receiver", &data.receiver);
            }
            TransactionData::External(data) => {
                checks.derived("data", data.validate());
                checks.not_blank("data.sender", &data.sender);
            }
            TransactionData::Sending(data) => {
                checks.derived("data", data.validate());
                checks.not_blank("data.receiver_initials", &data.receiver_initials);
            }
            TransactionData::Forex(data) => check_forex(&mut checks, data),
        }
        checks.finish("Invalid transaction data")
    }
}

impl RequestCheck for TransactionReviewRequest {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.derived("", self.validate());
        if self.state != ValidationState::Approved {
            let has_notes = self
                .notes
                .as_deref()
                .is_some_and(|notes| !notes.trim().is_empty());
            checks.require(has_notes, "notes", "should have comments");
        }
        checks.finish("Invalid Review")
    }
}

impl RequestCheck for TransactionUpdateRequest {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.derived("", self.validate());
        checks.amount_with_rate("amount", &self.amount);
        checks.non_negative("charges.amount", self.charges.amount);
        checks.finish("Invalid amount, rate or charges")
    }
}

impl RequestCheck for PaymentRequest {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.derived("", self.validate());
        checks.positive("amount", self.amount);
        checks.non_negative("rate", self.rate);
        checks.finish("Invalid payment data")
    }
}

impl RequestCheck for GroupedPaymentItem {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.not_blank("code", &self.code);
        if let Err(failure) = self.request.check() {
            checks.errors.extend(failure.errors.into_iter().map(|error| {
                FieldError::new(join("request", &error.path), error.message)
            }));
        }
        checks.finish("Invalid payment data")
    }
}

/// A grouped payment pays each transaction at most once.
impl RequestCheck for [GroupedPaymentItem] {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.require(!self.is_empty(), "items", "Select at least one transaction");
        let mut seen = HashSet::new();
        for (index, item) in self.iter().enumerate() {
            let prefix = index.to_string();
            if let Err(failure) = item.check() {
                checks.errors.extend(
                    failure
                        .errors
                        .into_iter()
                        .map(|error| FieldError::new(join(&prefix, &error.path), error.message)),
                );
            }
            checks.require(
                seen.insert(item.code.trim()),
                &join(&prefix, "code"),
                "Transaction is already in this payment",
            );
        }
        checks.finish("Invalid payment data")
    }
}

impl RequestCheck for CancellationRequest {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.derived("", self.validate());
        checks.require(
            !self.reason_text().is_empty(),
            "reason",
            "Select at least one reason",
        );
        checks.not_blank("description", &self.description);
        checks.finish("Invalid Cancellation data")
    }
}

impl RequestCheck for WalletTradeRequest {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.derived("", self.validate());
        checks.not_blank("walletID", &self.wallet_id);
        checks.positive("amount", self.amount);
        checks.positive("daily_rate", self.daily_rate);
        checks.positive("trading_rate", self.trading_rate);
        checks.require(
            self.request.matches(self.trading_type),
            "request.request_type",
            "Does not match the trading type",
        );

        match &self.request {
            TradeRequestKind::Buy { provider } | TradeRequestKind::Deposit { provider } => {
                checks.not_blank("request.provider", provider);
            }
            TradeRequestKind::Sell { customer, .. } => {
                checks.not_blank("request.customer", customer);
            }
            TradeRequestKind::Exchange {
                exchange_rate,
                wallet_id,
            } => {
                checks.positive("request.exchange_rate", *exchange_rate);
                checks.not_blank("request.walletID", wallet_id);
                checks.require(
                    wallet_id != &self.wallet_id,
                    "request.walletID",
                    "Cannot exchange into the same wallet",
                );
            }
            TradeRequestKind::ExchangeWithSimpleWallet {
                wallet_id,
                exchange_rate,
                selling_rate,
            } => {
                checks.positive("request.exchange_rate", *exchange_rate);
                checks.non_negative("request.selling_rate", *selling_rate);
                checks.not_blank("request.walletID", wallet_id);
                checks.require(
                    wallet_id != &self.wallet_id,
                    "request.walletID",
                    "Cannot exchange into the same wallet",
                );
            }
        }
        checks.finish("Invalid data")
    }
}

impl RequestCheck for TradeReviewRequest {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        if self.review != ValidationState::Approved {
            checks.require(
                self.tags.iter().any(|tag| !tag.trim().is_empty()),
                "tags",
                "Select at least one tag",
            );
        }
        checks.finish("Invalid review data")
    }
}

impl RequestCheck for OpenAccountRequest {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.derived("", self.validate());
        checks.not_blank("initials", &self.initials);
        if let Some(balance) = self.balance {
            checks.non_negative("balance", balance);
        }
        checks.finish("Invalid data")
    }
}

impl RequestCheck for UpdateAccountRequest {
    fn check(&self) -> Result<(), ValidationFailure> {
        let mut checks = Checks::default();
        checks.derived("", self.validate());
        checks.finish("Invalid data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::types::{
        AccountType, CustomerDetails, DepositData, ForexTag, InternalData,
    };
    use crate::trading::TradingType;
    use crate::workflow::types::TransactionType;
    use fxdesk_shared::types::Currency;
    use rust_decimal_macros::dec;

    fn internal(sender: &str, receiver: &str) -> TransactionRequest {
        TransactionRequest::new(
            AmountWithRate::new(dec!(100), dec!(3.67)),
            Some(AmountWithRate::new(dec!(0), dec!(3.67))),
            TransactionData::Internal(InternalData {
                sender: sender.to_string(),
                receiver: receiver.to_string(),
                tags: vec![],
            }),
        )
    }

    fn forex(tag: ForexTag, bank_rate: Option<Decimal>, bank_fees: Option<Decimal>) -> ForexData {
        ForexData {
            provider_account: "PRV".to_string(),
            customer_account: "CUS".to_string(),
            currency: Currency::Rmb,
            base_currency: Currency::Aed,
            daily_rate: dec!(3.67),
            buying_rate: dec!(2),
            selling_rate: dec!(2),
            amount: dec!(1000),
            bank_rate,
            bank_fees,
            tag,
        }
    }

    #[test]
    fn test_valid_internal() {
        assert!(internal("AGT1", "AGT2").check().is_ok());
    }

    #[test]
    fn test_internal_sender_equals_receiver() {
        let failure = internal("AGT1", "AGT1").check().unwrap_err();
        assert_eq!(failure.message, "Invalid transaction data");
        assert!(failure.has("data.receiver"));
    }

    #[test]
    fn test_identifier_too_long() {
        let failure = internal("A".repeat(21).as_str(), "AGT2").check().unwrap_err();
        assert!(failure.has("data.sender"));
    }

    #[test]
    fn test_amount_and_rate_must_be_positive() {
        let mut request = internal("AGT1", "AGT2");
        request.amount = AmountWithRate::new(dec!(0), dec!(-1));
        let failure = request.check().unwrap_err();
        assert!(failure.has("amount.amount"));
        assert!(failure.has("amount.rate"));
    }

    #[test]
    fn test_message_length() {
        let request = internal("AGT1", "AGT2").with_message("x".repeat(1025));
        assert!(request.check().unwrap_err().has("message"));
        let request = internal("AGT1", "AGT2").with_message("   ");
        assert_eq!(request.message, None);
    }

    #[test]
    fn test_type_mismatch() {
        let mut request = internal("AGT1", "AGT2");
        request.transaction_type = TransactionType::Deposit;
        assert!(request.check().unwrap_err().has("transaction_type"));
    }

    #[test]
    fn test_blank_deposit_receiver() {
        let request = TransactionRequest::new(
            AmountWithRate::new(dec!(5), dec!(1)),
            None,
            TransactionData::Deposit(DepositData {
                receiver: "  ".to_string(),
                tags: vec![],
            }),
        );
        assert!(request.check().unwrap_err().has("data.receiver"));
    }

    #[test]
    fn test_bank_fields_both_or_neither() {
        let mut checks = Checks::default();
        check_forex(&mut checks, &forex(ForexTag::BankTt, Some(dec!(3.65)), None));
        assert!(checks.finish("x").unwrap_err().has("data.bank_fees"));

        for (rate, fees) in [(None, None), (Some(dec!(3.65)), Some(dec!(20)))] {
            let mut checks = Checks::default();
            check_forex(&mut checks, &forex(ForexTag::BankTt, rate, fees));
            assert!(checks.finish("x").is_ok());
        }

        let mut checks = Checks::default();
        check_forex(&mut checks, &forex(ForexTag::AliPay, Some(dec!(3.65)), Some(dec!(20))));
        assert!(checks.finish("x").unwrap_err().has("data.tag"));
    }

    #[test]
    fn test_review_requires_notes_unless_approved() {
        let mut review = TransactionReviewRequest {
            code: "TR-1".to_string(),
            transaction_type: TransactionType::External,
            state: ValidationState::Rejected,
            notes: Some("  ".to_string()),
        };
        let failure = review.check().unwrap_err();
        assert_eq!(failure.message, "Invalid Review");
        assert_eq!(failure.errors, vec![FieldError::new("notes", "should have comments")]);

        review.state = ValidationState::Approved;
        review.notes = None;
        assert!(review.check().is_ok());
    }

    #[test]
    fn test_update_allows_zero_charges() {
        let update = TransactionUpdateRequest {
            code: "TR-1".to_string(),
            currency: None,
            transaction_type: TransactionType::External,
            amount: AmountWithRate::new(dec!(10), dec!(3.67)),
            charges: AmountWithRate::new(dec!(0), dec!(3.67)),
        };
        assert!(update.check().is_ok());
    }

    #[test]
    fn test_grouped_item_prefixes_paths() {
        let item = GroupedPaymentItem {
            code: "TR-1".to_string(),
            request: PaymentRequest {
                amount: dec!(0),
                rate: dec!(1),
                payment_type: TransactionType::Forex,
                customer: Some(CustomerDetails {
                    name: "n".repeat(101),
                    phone: String::new(),
                }),
                notes: None,
            },
        };
        let failure = item.check().unwrap_err();
        assert!(failure.has("request.amount"));
        assert!(failure.has("request.customer.name"));
    }

    fn grouped_item(code: &str) -> GroupedPaymentItem {
        GroupedPaymentItem {
            code: code.to_string(),
            request: PaymentRequest {
                amount: dec!(100),
                rate: dec!(3.67),
                payment_type: TransactionType::Forex,
                customer: None,
                notes: None,
            },
        }
    }

    #[test]
    fn test_grouped_payment_rejects_repeated_code() {
        let items = vec![grouped_item("FX-1"), grouped_item("FX-2"), grouped_item(" FX-1 ")];
        let failure = items.check().unwrap_err();
        assert_eq!(failure.message, "Invalid payment data");
        assert_eq!(
            failure.errors,
            vec![FieldError::new("2.code", "Transaction is already in this payment")]
        );

        assert!(items[..2].check().is_ok());
        assert!(items[..0].check().unwrap_err().has("items"));
    }

    #[test]
    fn test_cancellation_needs_reason_and_short_description() {
        let request = CancellationRequest {
            code: "TR-1".to_string(),
            transaction_type: TransactionType::Forex,
            reason: vec![" ".to_string()],
            description: "d".repeat(266),
        };
        let failure = request.check().unwrap_err();
        assert!(failure.has("reason"));
        assert!(failure.has("description"));
    }

    #[test]
    fn test_trade_kind_must_match_type() {
        let request = WalletTradeRequest {
            code: None,
            wallet_id: "W1".to_string(),
            trading_currency: None,
            exchange_currency: None,
            selling_currency: None,
            trading_type: TradingType::Buy,
            amount: dec!(1),
            daily_rate: dec!(3.67),
            trading_rate: dec!(3.7),
            message: None,
            request: TradeRequestKind::Exchange {
                exchange_rate: dec!(1),
                wallet_id: "W1".to_string(),
            },
        };
        let failure = request.check().unwrap_err();
        assert!(failure.has("request.request_type"));
        assert!(failure.has("request.walletID"));
    }

    #[test]
    fn test_trade_review_tags() {
        let review = TradeReviewRequest {
            review: ValidationState::Cancelled,
            tags: vec![],
        };
        assert!(review.check().unwrap_err().has("tags"));
    }

    #[test]
    fn test_account_initials_length() {
        let request = OpenAccountRequest {
            account_type: AccountType::Fund,
            currency: Currency::Aed,
            initials: "TOOLONG".to_string(),
            balance: Some(dec!(-1)),
            owner_initials: "AGT".to_string(),
        };
        let failure = request.check().unwrap_err();
        assert!(failure.has("initials"));
        assert!(failure.has("balance"));
    }
}
