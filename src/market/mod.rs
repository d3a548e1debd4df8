//! Market module for binary yes/no prediction markets.
//!
//! This module handles:
//! - Market pair types and raw exchange payloads
//! - The keyword-filtered market catalog
//! - The Polymarket CLOB client and its trait seam
//! - Scripted mock exchange for testing

pub mod catalog;
pub mod client;
pub mod mock;
pub mod types;

pub use catalog::Catalog;
pub use client::{ClobClient, ExchangeApi, OrderReceipt, OrderTicket};
pub use mock::MockExchange;
pub use types::{MarketPair, Outcome, Side, SimplifiedMarket};
