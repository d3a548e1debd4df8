//! Scripted mock exchange for unit testing.
//!
//! Implements [`ExchangeApi`] without network access: tests script the
//! market listing, per-token prices, and order verdicts, then inspect the
//! recorded submissions and cancellations.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::{MarketError, TradingError};

use super::client::{ExchangeApi, OrderReceipt, OrderTicket};
use super::types::{Side, SimplifiedMarket};

/// Mock exchange with scripted behavior.
#[derive(Debug, Default)]
pub struct MockExchange {
    markets: Mutex<Vec<SimplifiedMarket>>,
    fail_markets: Mutex<bool>,
    list_calls: AtomicU64,
    prices: Mutex<HashMap<String, Decimal>>,
    rejected_tokens: Mutex<HashSet<String>>,
    faulted_tokens: Mutex<HashSet<String>>,
    fail_cancel: Mutex<bool>,
    submitted: Mutex<Vec<OrderTicket>>,
    cancelled: Mutex<Vec<String>>,
    next_order_id: AtomicU64,
}

impl MockExchange {
    /// Create a mock with no markets, no prices, and all orders accepted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the market listing.
    pub fn set_markets(&self, markets: Vec<SimplifiedMarket>) {
        *self.markets.lock().unwrap() = markets;
    }

    /// Make `list_markets` fail.
    pub fn fail_market_listing(&self, fail: bool) {
        *self.fail_markets.lock().unwrap() = fail;
    }

    /// Number of times `list_markets` was called.
    pub fn list_market_calls(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Script the buy price for a token.
    pub fn set_price(&self, token_id: impl Into<String>, price: Decimal) {
        self.prices.lock().unwrap().insert(token_id.into(), price);
    }

    /// Remove a token's price so quoting it fails.
    pub fn clear_price(&self, token_id: &str) {
        self.prices.lock().unwrap().remove(token_id);
    }

    /// Orders for this token come back as explicit exchange rejections.
    pub fn reject_orders_for(&self, token_id: impl Into<String>) {
        self.rejected_tokens.lock().unwrap().insert(token_id.into());
    }

    /// Orders for this token fail with a transport error.
    pub fn fault_orders_for(&self, token_id: impl Into<String>) {
        self.faulted_tokens.lock().unwrap().insert(token_id.into());
    }

    /// Make cancellations fail.
    pub fn fail_cancellations(&self, fail: bool) {
        *self.fail_cancel.lock().unwrap() = fail;
    }

    /// Every ticket submitted, in order.
    pub fn submitted(&self) -> Vec<OrderTicket> {
        self.submitted.lock().unwrap().clone()
    }

    /// Every order id a cancellation was requested for, in order.
    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeApi for MockExchange {
    async fn list_markets(&self) -> Result<Vec<SimplifiedMarket>, MarketError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_markets.lock().unwrap() {
            return Err(MarketError::FetchFailed {
                reason: "scripted listing failure".to_string(),
            });
        }
        Ok(self.markets.lock().unwrap().clone())
    }

    async fn price(&self, token_id: &str, _side: Side) -> Result<Decimal, MarketError> {
        self.prices
            .lock()
            .unwrap()
            .get(token_id)
            .copied()
            .ok_or_else(|| MarketError::PriceUnavailable {
                token_id: token_id.to_string(),
                reason: "no scripted price".to_string(),
            })
    }

    async fn submit_order(&self, ticket: &OrderTicket) -> Result<OrderReceipt, TradingError> {
        if self.faulted_tokens.lock().unwrap().contains(&ticket.token_id) {
            return Err(TradingError::SubmissionFailed(
                "scripted transport fault".to_string(),
            ));
        }

        self.submitted.lock().unwrap().push(ticket.clone());

        if self.rejected_tokens.lock().unwrap().contains(&ticket.token_id) {
            return Ok(OrderReceipt {
                order_id: None,
                error: Some("scripted rejection".to_string()),
                success: Some(false),
            });
        }

        let n = self.next_order_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(OrderReceipt {
            order_id: Some(format!("ord-{n}")),
            error: None,
            success: Some(true),
        })
    }

    async fn cancel_order(&self, order_id: &str) -> Result<(), TradingError> {
        self.cancelled.lock().unwrap().push(order_id.to_string());
        if *self.fail_cancel.lock().unwrap() {
            return Err(TradingError::CancelFailed {
                order_id: order_id.to_string(),
                reason: "scripted cancel failure".to_string(),
            });
        }
        Ok(())
    }
}
