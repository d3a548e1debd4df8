//! The scan-loop driver tying catalog, detector, executor, ledger, and
//! reporter together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use time::{Date, OffsetDateTime};
use tracing::{error, info, warn};

use crate::arbitrage::{detect, execute_pair, ExecutionOutcome};
use crate::config::Config;
use crate::error::BotError;
use crate::ledger::{DailyReport, Ledger};
use crate::market::catalog::Catalog;
use crate::market::client::ExchangeApi;
use crate::market::types::{MarketPair, Side};
use crate::metrics;
use crate::report::ReportSink;

/// Sleep after a faulted tick before retrying.
const FAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// The driver: owns the catalog and ledger, and runs the scan loop on a
/// single logical thread of control.
pub struct Bot<A, R> {
    config: Config,
    api: A,
    reporter: R,
    catalog: Catalog,
    ledger: Ledger,
}

impl<A: ExchangeApi, R: ReportSink> Bot<A, R> {
    /// Create a bot with an empty catalog and a ledger opened on today's
    /// UTC date.
    pub fn new(config: Config, api: A, reporter: R) -> Self {
        Self {
            config,
            api,
            reporter,
            catalog: Catalog::new(),
            ledger: Ledger::new(OffsetDateTime::now_utc().date()),
        }
    }

    /// The ledger's current state.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The catalog's current state.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run until `stop` is set. The flag is only honored at tick
    /// boundaries, so an in-progress two-leg execution always runs to
    /// completion or explicit failure first.
    pub async fn run(&mut self, stop: Arc<AtomicBool>) {
        info!(
            threshold = %self.config.arb_threshold,
            shares = %self.config.shares_per_trade,
            scan_interval_secs = self.config.scan_interval_secs,
            keywords = ?self.config.market_keywords,
            "Arbitrage bot starting"
        );

        // Initial catalog load; an empty catalog just means empty scans
        // until the next refresh succeeds.
        if let Err(e) = self
            .catalog
            .refresh(&self.api, &self.config.market_keywords)
            .await
        {
            warn!(error = %e, "Initial market load failed");
        } else {
            metrics::record_catalog_refresh();
        }

        while !stop.load(Ordering::SeqCst) {
            match self.tick().await {
                Ok(()) => {
                    tokio::time::sleep(Duration::from_secs(self.config.scan_interval_secs)).await;
                }
                Err(e) => {
                    error!(error = %e, "Tick faulted, cooling down");
                    metrics::record_tick_fault();
                    tokio::time::sleep(FAULT_COOLDOWN).await;
                }
            }
        }

        info!("Stop requested, sending final report");
        self.deliver(&self.ledger.snapshot()).await;

        let ledger = &self.ledger;
        info!(
            scans = ledger.scans,
            opps = ledger.opps,
            trades = ledger.successful_trades,
            daily_profit = %ledger.daily_profit,
            total_profit = %ledger.total_profit,
            invested = %ledger.invested,
            "Final stats"
        );
    }

    /// One scan tick at the real current date.
    pub async fn tick(&mut self) -> Result<(), BotError> {
        self.tick_at(OffsetDateTime::now_utc().date()).await
    }

    /// One scan tick, with the date injected so rollover is testable.
    ///
    /// Order matters: the rollover check runs before any scanning so the
    /// daily report can never include the new day's activity.
    pub async fn tick_at(&mut self, today: Date) -> Result<(), BotError> {
        if let Some(report) = self.ledger.close_day(today) {
            info!(date = %report.date, daily_profit = %report.daily_profit, "Daily rollover");
            self.deliver(&report).await;
        }

        self.ledger.record_scan();
        metrics::record_scan();

        // Snapshot the catalog so a refresh below cannot touch this pass.
        for pair in self.catalog.snapshot() {
            if let Err(e) = self.scan_pair(&pair).await {
                warn!(question = %pair.question, error = %e, "Pair scan failed");
            }
        }

        if self.ledger.scans % self.config.refresh_every_scans == 0 {
            match self
                .catalog
                .refresh(&self.api, &self.config.market_keywords)
                .await
            {
                Ok(count) => {
                    metrics::record_catalog_refresh();
                    info!(pairs = count, scans = self.ledger.scans, "Catalog refreshed");
                }
                Err(e) => warn!(error = %e, "Catalog refresh failed, keeping previous"),
            }
        }

        Ok(())
    }

    /// Quote both sides of one pair, detect, and execute on a hit.
    async fn scan_pair(&mut self, pair: &MarketPair) -> Result<(), BotError> {
        let yes_price = self.api.price(&pair.yes_token_id, Side::Buy).await?;
        let no_price = self.api.price(&pair.no_token_id, Side::Buy).await?;

        let Some(opp) = detect(yes_price, no_price, self.config.arb_threshold) else {
            return Ok(());
        };

        self.ledger.record_opportunity();
        metrics::record_opportunity();
        info!(
            question = %pair.question,
            combined = %opp.combined,
            edge = %opp.edge,
            "OPPORTUNITY"
        );

        let outcome = execute_pair(
            &self.api,
            pair,
            yes_price,
            no_price,
            &self.config,
            &mut self.ledger,
        )
        .await;

        match outcome {
            ExecutionOutcome::Completed { profit, .. } => {
                metrics::record_trade_completed();
                info!(
                    profit = %profit,
                    opps = self.ledger.opps,
                    trades = self.ledger.successful_trades,
                    daily_profit = %self.ledger.daily_profit,
                    "Trade completed"
                );
            }
            ExecutionOutcome::Aborted {
                failed_leg,
                cleanup,
            } => {
                metrics::record_trade_aborted();
                warn!(failed_leg = %failed_leg, cleanup = ?cleanup, "Execution aborted");
            }
        }

        Ok(())
    }

    /// Hand a report to the sink; delivery failure is logged, never
    /// escalated, and never retried within the same rollover.
    async fn deliver(&self, report: &DailyReport) {
        match self.reporter.send_report(report).await {
            Ok(()) => metrics::record_report_sent(),
            Err(e) => warn!(error = %e, date = %report.date, "Report delivery failed"),
        }
    }
}
