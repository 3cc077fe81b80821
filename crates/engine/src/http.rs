//! HTTP client for the accounting engine REST API.

use std::time::Duration;

use async_trait::async_trait;
use fxdesk_core::request::{
    CancellationRequest, CommitTradeRequest, FieldError, OpenAccountRequest, PartnerPaidRequest,
    PaymentRequest, TradeReviewRequest, TradeRollbackRequest, TransactionRequest,
    TransactionReviewRequest, TransactionUpdateRequest, UpdateAccountRequest, WalletTradeRequest,
};
use fxdesk_core::workflow::TransactionType;
use fxdesk_shared::config::EngineConfig;
use fxdesk_shared::types::{TransactionCode, WalletId};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dto::{
    AccountResponse, OfficeWalletResponse, PaymentResponse, TransactionResponse,
    WalletTradingResponse,
};
use crate::engine::{AccountingEngine, EngineResult};
use crate::error::EngineError;

/// Error body returned by the engine.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Fields(Vec<DetailItem>),
}

#[derive(Debug, Deserialize)]
struct DetailItem {
    #[serde(default)]
    loc: Vec<serde_json::Value>,
    msg: String,
}

impl DetailItem {
    /// Dotted field path, without the leading `body` segment.
    fn path(&self) -> String {
        self.loc
            .iter()
            .filter_map(|segment| match segment {
                serde_json::Value::String(s) if s != "body" => Some(s.clone()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Maps an error response to an [`EngineError`].
///
/// The server message is kept verbatim. Field details become path-keyed
/// errors; a plain-text detail wins over the generic message.
pub(crate) fn api_error(status: StatusCode, body: &str) -> EngineError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let (detail_message, errors) = match parsed.detail {
        Some(Detail::Text(text)) => (Some(text), Vec::new()),
        Some(Detail::Fields(items)) => {
            let errors = items
                .iter()
                .map(|item| FieldError::new(item.path(), item.msg.clone()))
                .collect();
            (None, errors)
        }
        None => (None, Vec::new()),
    };
    let message = detail_message
        .or(parsed.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {status}"), ToString::to_string)
        });

    if status == StatusCode::CONFLICT {
        return EngineError::Conflict(message);
    }
    EngineError::Api {
        status: status.as_u16(),
        message,
        errors,
    }
}

/// Path segments every engine route starts with.
const API_PREFIX: [&str; 2] = ["api", "v1"];

/// [`AccountingEngine`] over the engine's REST API.
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl HttpEngine {
    /// Builds a client from the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path, the token is not
    /// a valid header value, or the HTTP client cannot be initialized.
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| EngineError::Transport(format!("Invalid engine url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(EngineError::Transport(format!(
                "Invalid engine url: {base_url} cannot carry a path"
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = config.api_token.as_deref().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| EngineError::Transport(format!("Invalid api token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Transport(format!("Failed to initialize HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            headers,
        })
    }

    /// Route under `/api/v1`, each segment percent-encoded on its own.
    fn url(&self, segments: &[&str]) -> EngineResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| EngineError::Transport(format!("Invalid engine url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(API_PREFIX.iter().chain(segments));
        Ok(url)
    }

    /// Route filtered by transaction type.
    fn typed_url(&self, segments: &[&str], transaction_type: TransactionType) -> EngineResult<Url> {
        let mut url = self.url(segments)?;
        url.query_pairs_mut()
            .append_pair("type", transaction_type.as_str());
        Ok(url)
    }

    fn trade_url(&self, wallet_id: &str, code: &str, action: Option<&str>) -> EngineResult<Url> {
        match action {
            Some(action) => self.url(&["wallets", wallet_id, "trades", code, action]),
            None => self.url(&["wallets", wallet_id, "trades", code]),
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> EngineResult<T> {
        debug!(%url, "GET");
        self.send(self.client.get(url)).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, url: Url, body: &B) -> EngineResult<T> {
        debug!(%url, "POST");
        self.send(self.client.post(url).json(body)).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(&self, url: Url, body: &B) -> EngineResult<T> {
        debug!(%url, "PUT");
        self.send(self.client.put(url).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> EngineResult<T> {
        let response = request.headers(self.headers.clone()).send().await?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> EngineResult<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl AccountingEngine for HttpEngine {
    async fn request_transaction(&self, request: &TransactionRequest) -> EngineResult<TransactionResponse> {
        self.post(self.url(&["transactions"])?, request).await
    }

    async fn get_transaction(
        &self,
        code: &TransactionCode,
        transaction_type: TransactionType,
    ) -> EngineResult<TransactionResponse> {
        self.get(self.typed_url(&["transactions", code.as_str()], transaction_type)?)
            .await
    }

    async fn review_transaction(&self, request: &TransactionReviewRequest) -> EngineResult<TransactionResponse> {
        self.post(self.url(&["transactions", &request.code, "review"])?, request)
            .await
    }

    async fn update_transaction(&self, request: &TransactionUpdateRequest) -> EngineResult<TransactionResponse> {
        self.put(self.url(&["transactions", &request.code])?, request)
            .await
    }

    async fn pay_transaction(
        &self,
        code: &TransactionCode,
        request: &PaymentRequest,
    ) -> EngineResult<PaymentResponse> {
        self.post(self.url(&["transactions", code.as_str(), "payments"])?, request)
            .await
    }

    async fn list_payments(
        &self,
        code: &TransactionCode,
        transaction_type: TransactionType,
    ) -> EngineResult<Vec<PaymentResponse>> {
        self.get(self.typed_url(&["transactions", code.as_str(), "payments"], transaction_type)?)
            .await
    }

    async fn cancel_transaction(&self, request: &CancellationRequest) -> EngineResult<TransactionResponse> {
        self.post(self.url(&["transactions", &request.code, "cancel"])?, request)
            .await
    }

    async fn cancel_payment(
        &self,
        payment_id: &str,
        request: &CancellationRequest,
    ) -> EngineResult<PaymentResponse> {
        self.post(self.url(&["payments", payment_id, "cancel"])?, request)
            .await
    }

    async fn trade_wallet(&self, request: &WalletTradeRequest) -> EngineResult<WalletTradingResponse> {
        self.post(self.url(&["wallets", &request.wallet_id, "trades"])?, request)
            .await
    }

    async fn get_wallet(&self, wallet_id: &WalletId) -> EngineResult<OfficeWalletResponse> {
        self.get(self.url(&["wallets", wallet_id.as_str()])?).await
    }

    async fn list_wallet_trades(&self, wallet_id: &WalletId) -> EngineResult<Vec<WalletTradingResponse>> {
        self.get(self.url(&["wallets", wallet_id.as_str(), "trades"])?)
            .await
    }

    async fn get_trade(
        &self,
        wallet_id: &WalletId,
        code: &TransactionCode,
    ) -> EngineResult<WalletTradingResponse> {
        self.get(self.trade_url(wallet_id.as_str(), code.as_str(), None)?)
            .await
    }

    async fn update_trade(&self, request: &WalletTradeRequest) -> EngineResult<WalletTradingResponse> {
        let code = request.code.as_deref().ok_or_else(|| EngineError::Api {
            status: 400,
            message: "Trade code is required".to_string(),
            errors: vec![FieldError::new("code", "Trade code is required")],
        })?;
        self.put(self.trade_url(&request.wallet_id, code, None)?, request)
            .await
    }

    async fn review_trade(
        &self,
        wallet_id: &WalletId,
        code: &TransactionCode,
        request: &TradeReviewRequest,
    ) -> EngineResult<WalletTradingResponse> {
        self.post(self.trade_url(wallet_id.as_str(), code.as_str(), Some("review"))?, request)
            .await
    }

    async fn commit_trade(&self, request: &CommitTradeRequest) -> EngineResult<WalletTradingResponse> {
        self.post(
            self.trade_url(&request.wallet_id, &request.trade_id, Some("commit"))?,
            request,
        )
        .await
    }

    async fn pay_trade(
        &self,
        wallet_id: &WalletId,
        code: &TransactionCode,
        request: &PaymentRequest,
    ) -> EngineResult<WalletTradingResponse> {
        self.post(self.trade_url(wallet_id.as_str(), code.as_str(), Some("pay"))?, request)
            .await
    }

    async fn rollback_trade(
        &self,
        wallet_id: &WalletId,
        request: &TradeRollbackRequest,
    ) -> EngineResult<WalletTradingResponse> {
        self.post(self.trade_url(wallet_id.as_str(), &request.code, Some("rollback"))?, request)
            .await
    }

    async fn update_partner_paid(
        &self,
        wallet_id: &WalletId,
        request: &PartnerPaidRequest,
    ) -> EngineResult<WalletTradingResponse> {
        self.put(
            self.trade_url(wallet_id.as_str(), &request.code, Some("partner-paid"))?,
            request,
        )
        .await
    }

    async fn enable_balance_tracking(&self, wallet_id: &WalletId) -> EngineResult<OfficeWalletResponse> {
        self.post(
            self.url(&["wallets", wallet_id.as_str(), "balance-tracking"])?,
            &serde_json::json!({ "enabled": true }),
        )
        .await
    }

    async fn open_account(&self, request: &OpenAccountRequest) -> EngineResult<AccountResponse> {
        self.post(self.url(&["accounts"])?, request).await
    }

    async fn get_account(&self, initials: &str) -> EngineResult<AccountResponse> {
        self.get(self.url(&["accounts", initials])?).await
    }

    async fn update_account(&self, request: &UpdateAccountRequest) -> EngineResult<AccountResponse> {
        self.put(self.url(&["accounts", &request.initials])?, request)
            .await
    }
}
