//! End-to-end driver tests over the scripted mock exchange.
//!
//! Every collaborator sits behind a trait, so these run entirely
//! in-process: the mock exchange scripts the market listing, prices, and
//! order verdicts, and the recording reporter captures deliveries.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use pairlock::bot::Bot;
use pairlock::config::Config;
use pairlock::market::{MockExchange, SimplifiedMarket};
use pairlock::report::RecordingReporter;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn test_config() -> Config {
    Config {
        polymarket_api_key: "test-key".to_string(),
        polymarket_api_secret: None,
        polymarket_api_passphrase: None,
        polymarket_funder: None,
        polymarket_clob_url: "https://clob.polymarket.com".to_string(),
        chain_id: 137,
        arb_threshold: dec!(0.98),
        shares_per_trade: dec!(25),
        fee_rate: dec!(0.02),
        scan_interval_secs: 2,
        refresh_every_scans: 1,
        market_keywords: vec!["bitcoin".to_string(), "15 minute".to_string()],
        arb_pure_percent: 75,
        arb_lag_percent: 25,
        discord_webhook_url: None,
        http_timeout_ms: 2000,
        http_pool_size: 10,
        metrics_enabled: false,
        metrics_port: 9090,
        rust_log: "info".to_string(),
    }
}

fn btc_market() -> SimplifiedMarket {
    SimplifiedMarket {
        question: Some("Bitcoin up in the next 15 minutes?".to_string()),
        active: Some(true),
        clob_token_ids: Some(r#"["no-tok", "yes-tok"]"#.to_string()),
    }
}

#[tokio::test]
async fn full_cycle_scans_detects_and_locks_profit() {
    let api = Arc::new(MockExchange::new());
    api.set_markets(vec![btc_market()]);
    api.set_price("yes-tok", dec!(0.45));
    api.set_price("no-tok", dec!(0.50));

    let reporter = Arc::new(RecordingReporter::new());
    let mut bot = Bot::new(test_config(), api.clone(), reporter.clone());

    // First tick loads the catalog (cadence 1); second tick trades on it.
    let today = bot.ledger().current_date();
    bot.tick_at(today).await.unwrap();
    assert_eq!(bot.ledger().successful_trades, 0);

    bot.tick_at(today).await.unwrap();

    assert_eq!(bot.ledger().scans, 2);
    assert_eq!(bot.ledger().opps, 1);
    assert_eq!(bot.ledger().successful_trades, 1);
    assert_eq!(bot.ledger().daily_profit, dec!(0.75));
    assert_eq!(bot.ledger().total_profit, dec!(0.75));
    assert_eq!(bot.ledger().invested, dec!(23.75));

    // NO leg first, YES leg second, both at the quoted prices.
    let submitted = api.submitted();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].token_id, "no-tok");
    assert_eq!(submitted[1].token_id, "yes-tok");
}

#[tokio::test]
async fn partial_failure_unwinds_and_books_nothing() {
    let api = Arc::new(MockExchange::new());
    api.set_markets(vec![btc_market()]);
    api.set_price("yes-tok", dec!(0.45));
    api.set_price("no-tok", dec!(0.50));
    api.reject_orders_for("yes-tok");

    let reporter = Arc::new(RecordingReporter::new());
    let mut bot = Bot::new(test_config(), api.clone(), reporter.clone());

    let today = bot.ledger().current_date();
    bot.tick_at(today).await.unwrap();
    bot.tick_at(today).await.unwrap();

    // Opportunity was seen but the trade failed, so only the opportunity
    // counter moved; the NO leg got a cancellation request.
    assert_eq!(bot.ledger().opps, 1);
    assert_eq!(bot.ledger().successful_trades, 0);
    assert_eq!(bot.ledger().daily_profit, Decimal::ZERO);
    assert_eq!(bot.ledger().invested, Decimal::ZERO);
    assert_eq!(api.cancelled().len(), 1);
}

#[tokio::test]
async fn shutdown_sends_one_final_report() {
    let api = Arc::new(MockExchange::new());
    api.set_markets(vec![btc_market()]);

    let reporter = Arc::new(RecordingReporter::new());
    let mut bot = Bot::new(test_config(), api.clone(), reporter.clone());

    let stop = Arc::new(AtomicBool::new(true));
    bot.run(stop).await;

    let reports = reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].date, bot.ledger().current_date());
    assert_eq!(reports[0].daily_profit, Decimal::ZERO);
}

#[tokio::test]
async fn rollover_report_reflects_the_closed_day() {
    let api = Arc::new(MockExchange::new());
    api.set_markets(vec![btc_market()]);
    api.set_price("yes-tok", dec!(0.45));
    api.set_price("no-tok", dec!(0.50));

    let reporter = Arc::new(RecordingReporter::new());
    let mut bot = Bot::new(test_config(), api.clone(), reporter.clone());

    let day_one = bot.ledger().current_date();
    bot.tick_at(day_one).await.unwrap(); // loads catalog
    bot.tick_at(day_one).await.unwrap(); // locks 0.75 profit

    let day_two = day_one.next_day().unwrap();
    bot.tick_at(day_two).await.unwrap();

    let reports = reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].date, day_one);
    assert_eq!(reports[0].daily_profit, dec!(0.75));
    assert_eq!(reports[0].successful_trades, 1);

    // The new day trades again on the same prices.
    assert_eq!(bot.ledger().daily_profit, dec!(0.75));
    assert_eq!(bot.ledger().total_profit, dec!(1.50));
}
