//! Exchange trait seam and the Polymarket CLOB client.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{MarketError, TradingError};

use super::types::{Side, SimplifiedMarket};

/// Parameters for one fill-or-kill order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTicket {
    /// Token ID to trade.
    pub token_id: String,
    /// Order side (buy/sell).
    pub side: Side,
    /// Limit price as a decimal fraction of $1.00.
    pub price: Decimal,
    /// Order size in shares.
    pub size: Decimal,
}

impl OrderTicket {
    /// Create a buy ticket.
    pub fn buy(token_id: impl Into<String>, price: Decimal, size: Decimal) -> Self {
        Self {
            token_id: token_id.into(),
            side: Side::Buy,
            price,
            size,
        }
    }

    /// Sanity-check the ticket before it reaches the wire.
    pub fn validate(&self) -> Result<(), String> {
        if self.token_id.is_empty() {
            return Err("token_id is empty".to_string());
        }
        if self.price <= Decimal::ZERO || self.price >= Decimal::ONE {
            return Err(format!("price {} outside (0, 1)", self.price));
        }
        if self.size <= Decimal::ZERO {
            return Err(format!("size {} not positive", self.size));
        }
        Ok(())
    }
}

/// Order submission verdict from the exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderReceipt {
    /// Order ID (various field names across API versions).
    #[serde(alias = "orderID", alias = "orderId", alias = "order_id", alias = "id")]
    pub order_id: Option<String>,
    /// Error message if any.
    pub error: Option<String>,
    /// Success flag.
    pub success: Option<bool>,
}

impl OrderReceipt {
    /// A leg counts as filled only when the exchange affirms success and
    /// reports no error. A missing flag is treated as failure.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.success == Some(true)
    }
}

/// Capability set consumed from the external trading API.
///
/// The engine only ever talks to the exchange through this seam, so tests
/// drive it with [`super::mock::MockExchange`] instead of the network.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// List all known markets in the exchange's simplified shape.
    async fn list_markets(&self) -> Result<Vec<SimplifiedMarket>, MarketError>;

    /// Current executable price for a token on the given side.
    async fn price(&self, token_id: &str, side: Side) -> Result<Decimal, MarketError>;

    /// Submit a fill-or-kill order: fills completely at submission or is
    /// rejected outright, never rests on the book.
    async fn submit_order(&self, ticket: &OrderTicket) -> Result<OrderReceipt, TradingError>;

    /// Cancel a previously submitted order. Best-effort.
    async fn cancel_order(&self, order_id: &str) -> Result<(), TradingError>;
}

#[async_trait]
impl<T: ExchangeApi + ?Sized> ExchangeApi for std::sync::Arc<T> {
    async fn list_markets(&self) -> Result<Vec<SimplifiedMarket>, MarketError> {
        (**self).list_markets().await
    }

    async fn price(&self, token_id: &str, side: Side) -> Result<Decimal, MarketError> {
        (**self).price(token_id, side).await
    }

    async fn submit_order(&self, ticket: &OrderTicket) -> Result<OrderReceipt, TradingError> {
        (**self).submit_order(ticket).await
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), TradingError> {
        (**self).cancel_order(order_id).await
    }
}

/// Markets listing response wrapper.
#[derive(Debug, Deserialize)]
struct SimplifiedMarketsResponse {
    data: Vec<SimplifiedMarket>,
}

/// Price quote response.
#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: String,
}

/// Order submission request body.
#[derive(Debug, Serialize)]
struct OrderRequest {
    token_id: String,
    side: String,
    price: String,
    size: String,
    order_type: String,
    nonce: String,
    owner: String,
}

/// Polymarket CLOB API client.
#[derive(Debug, Clone)]
pub struct ClobClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL for CLOB API.
    clob_url: String,
    /// API key credential.
    api_key: String,
    /// Optional API passphrase.
    api_passphrase: Option<String>,
    /// Funder address attached to orders, when configured.
    funder: Option<String>,
    /// Chain ID (137 for Polygon).
    chain_id: u64,
}

impl ClobClient {
    /// Create a new client from config with tuned HTTP settings.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(std::time::Duration::from_millis(500))
            .tcp_nodelay(true)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .pool_max_idle_per_host(config.http_pool_size)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            clob_url: config.polymarket_clob_url.clone(),
            api_key: config.polymarket_api_key.clone(),
            api_passphrase: config.polymarket_api_passphrase.clone(),
            funder: config.polymarket_funder.clone(),
            chain_id: config.chain_id,
        }
    }

    /// Get the CLOB base URL.
    pub fn clob_url(&self) -> &str {
        &self.clob_url
    }

    /// Get the chain ID.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Credential headers attached to every authenticated call.
    fn auth_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("POLY-API-KEY", self.api_key.clone()),
            (
                "POLY-TIMESTAMP",
                chrono::Utc::now().timestamp_millis().to_string(),
            ),
        ];
        if let Some(passphrase) = &self.api_passphrase {
            headers.push(("POLY-PASSPHRASE", passphrase.clone()));
        }
        headers
    }

    fn wire_side(side: Side) -> &'static str {
        match side {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

#[async_trait]
impl ExchangeApi for ClobClient {
    #[instrument(skip(self))]
    async fn list_markets(&self) -> Result<Vec<SimplifiedMarket>, MarketError> {
        let url = format!("{}/simplified-markets", self.clob_url);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(MarketError::FetchFailed {
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body: SimplifiedMarketsResponse = response
            .json()
            .await
            .map_err(|e| MarketError::ParseError(format!("failed to parse market list: {e}")))?;

        debug!(count = body.data.len(), "Fetched market list");

        Ok(body.data)
    }

    #[instrument(skip(self), fields(token_id = %token_id))]
    async fn price(&self, token_id: &str, side: Side) -> Result<Decimal, MarketError> {
        let url = format!("{}/price", self.clob_url);

        let response = self
            .http
            .get(&url)
            .query(&[("token_id", token_id), ("side", Self::wire_side(side))])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MarketError::PriceUnavailable {
                token_id: token_id.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let quote: PriceResponse = response
            .json()
            .await
            .map_err(|e| MarketError::ParseError(format!("failed to parse price: {e}")))?;

        quote.price.parse::<Decimal>().map_err(|e| {
            MarketError::ParseError(format!("price {:?} not decimal: {e}", quote.price))
        })
    }

    #[instrument(skip(self, ticket), fields(token = %ticket.token_id, side = ?ticket.side))]
    async fn submit_order(&self, ticket: &OrderTicket) -> Result<OrderReceipt, TradingError> {
        ticket.validate().map_err(TradingError::InvalidParams)?;

        debug!(price = %ticket.price, size = %ticket.size, "Submitting FOK order");

        let order_request = OrderRequest {
            token_id: ticket.token_id.clone(),
            side: Self::wire_side(ticket.side).to_string(),
            price: ticket.price.to_string(),
            size: ticket.size.to_string(),
            order_type: "FOK".to_string(),
            nonce: chrono::Utc::now().timestamp_millis().to_string(),
            owner: self.funder.clone().unwrap_or_else(|| self.api_key.clone()),
        };

        let url = format!("{}/order", self.clob_url);

        let mut request = self.http.post(&url).json(&order_request);
        for (key, value) in self.auth_headers() {
            request = request.header(key, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TradingError::SubmissionFailed(format!("order POST failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TradingError::SubmissionFailed(format!(
                "HTTP {status} - {body}"
            )));
        }

        response
            .json::<OrderReceipt>()
            .await
            .map_err(|e| TradingError::SubmissionFailed(format!("failed to parse receipt: {e}")))
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn cancel_order(&self, order_id: &str) -> Result<(), TradingError> {
        let url = format!("{}/order/{}", self.clob_url, order_id);

        let mut request = self.http.delete(&url);
        for (key, value) in self.auth_headers() {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(|e| TradingError::CancelFailed {
            order_id: order_id.to_string(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(TradingError::CancelFailed {
                order_id: order_id.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        debug!("Order cancelled");
        Ok(())
    }
}
