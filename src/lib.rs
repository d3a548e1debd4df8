//! Yes/no pair arbitrage bot for Polymarket prediction markets.
//!
//! The strategy: for a binary market, buying one YES share and one NO share
//! always pays out exactly $1.00 at settlement. Whenever the combined buy
//! price of both outcomes dips below a configured threshold, buying both
//! sides locks in the difference regardless of which outcome wins.
//!
//! ```text
//! YES price:  $0.45
//! NO price:   $0.50
//! ─────────────────
//! Combined:   $0.95 < $0.98 threshold
//! Edge:       $0.05 per share pair (before fees)
//! ```
//!
//! The bot scans a keyword-filtered catalog of market pairs on a fixed
//! interval, fires two sequential fill-or-kill buy orders when an
//! opportunity appears, and tracks profit in a ledger that rolls over at
//! UTC midnight with a Discord report.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Market catalog and exchange client
//! - [`arbitrage`]: Opportunity detection and two-leg execution
//! - [`ledger`]: Scan/profit counters and daily rollover
//! - [`report`]: Daily summary delivery
//! - [`bot`]: The scan-loop driver

pub mod arbitrage;
pub mod bot;
pub mod config;
pub mod error;
pub mod ledger;
pub mod market;
pub mod metrics;
pub mod report;

pub use config::Config;
pub use error::{BotError, Result};
