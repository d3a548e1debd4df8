//! Prometheus counters for the scan loop.

use metrics::{counter, describe_counter};
use tracing::debug;

// === Metric Name Constants ===

/// Scan ticks counter metric name.
pub const METRIC_SCANS: &str = "scans_total";
/// Opportunities detected counter metric name.
pub const METRIC_OPPORTUNITIES_DETECTED: &str = "opportunities_detected_total";
/// Completed two-leg trades counter metric name.
pub const METRIC_TRADES_COMPLETED: &str = "trades_completed_total";
/// Aborted execution attempts counter metric name.
pub const METRIC_TRADES_ABORTED: &str = "trades_aborted_total";
/// Catalog refreshes counter metric name.
pub const METRIC_CATALOG_REFRESHES: &str = "catalog_refreshes_total";
/// Delivered daily reports counter metric name.
pub const METRIC_REPORTS_SENT: &str = "reports_sent_total";
/// Tick-level faults counter metric name.
pub const METRIC_TICK_FAULTS: &str = "tick_faults_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_SCANS, "Total number of scan ticks");
    describe_counter!(
        METRIC_OPPORTUNITIES_DETECTED,
        "Total number of arbitrage opportunities detected"
    );
    describe_counter!(
        METRIC_TRADES_COMPLETED,
        "Total number of fully executed two-leg trades"
    );
    describe_counter!(
        METRIC_TRADES_ABORTED,
        "Total number of execution attempts aborted on a failed leg"
    );
    describe_counter!(
        METRIC_CATALOG_REFRESHES,
        "Total number of successful market catalog refreshes"
    );
    describe_counter!(METRIC_REPORTS_SENT, "Total number of delivered daily reports");
    describe_counter!(METRIC_TICK_FAULTS, "Total number of faulted scan ticks");

    debug!("Metrics initialized");
}

/// Record one scan tick.
pub fn record_scan() {
    counter!(METRIC_SCANS).increment(1);
}

/// Record one detected opportunity.
pub fn record_opportunity() {
    counter!(METRIC_OPPORTUNITIES_DETECTED).increment(1);
}

/// Record one completed trade.
pub fn record_trade_completed() {
    counter!(METRIC_TRADES_COMPLETED).increment(1);
}

/// Record one aborted execution attempt.
pub fn record_trade_aborted() {
    counter!(METRIC_TRADES_ABORTED).increment(1);
}

/// Record one successful catalog refresh.
pub fn record_catalog_refresh() {
    counter!(METRIC_CATALOG_REFRESHES).increment(1);
}

/// Record one delivered report.
pub fn record_report_sent() {
    counter!(METRIC_REPORTS_SENT).increment(1);
}

/// Record one faulted tick.
pub fn record_tick_fault() {
    counter!(METRIC_TICK_FAULTS).increment(1);
}
