//! Daily summary delivery to an external notification channel.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, info};

use crate::error::ReportError;
use crate::ledger::DailyReport;

/// Outbound report channel.
///
/// Delivery failures are surfaced to the caller, which logs and drops them;
/// a report is never retried within the same rollover and never fatal.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Deliver one daily summary.
    async fn send_report(&self, report: &DailyReport) -> Result<(), ReportError>;
}

#[async_trait]
impl<T: ReportSink + ?Sized> ReportSink for std::sync::Arc<T> {
    async fn send_report(&self, report: &DailyReport) -> Result<(), ReportError> {
        (**self).send_report(report).await
    }
}

/// Discord webhook reporter.
#[derive(Debug, Clone)]
pub struct DiscordReporter {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl DiscordReporter {
    /// Create a reporter. With no webhook URL configured, every send is
    /// skipped with a log line instead of failing.
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// Build the webhook embed payload.
    fn embed_payload(report: &DailyReport) -> serde_json::Value {
        let color = if report.daily_profit >= Decimal::ZERO {
            0x00ff00
        } else {
            0xff0000
        };

        json!({
            "username": "Arb Bot",
            "embeds": [{
                "title": "Daily Polymarket Arb Bot Report",
                "description": format!("Report for {}", report.date),
                "color": color,
                "fields": [
                    {"name": "Daily Profit", "value": format!("${:.2}", report.daily_profit), "inline": true},
                    {"name": "Total Compounded Profit", "value": format!("${:.2}", report.total_profit), "inline": true},
                    {"name": "Opportunities Found (Day)", "value": report.opps.to_string(), "inline": true},
                    {"name": "Successful Trades (Day)", "value": report.successful_trades.to_string(), "inline": true},
                    {"name": "Total Invested (Cumulative)", "value": format!("${:.2}", report.invested), "inline": true},
                ],
            }]
        })
    }
}

#[async_trait]
impl ReportSink for DiscordReporter {
    async fn send_report(&self, report: &DailyReport) -> Result<(), ReportError> {
        let Some(url) = &self.webhook_url else {
            info!("No Discord webhook configured, skipping report");
            return Ok(());
        };

        let payload = Self::embed_payload(report);
        let response = self.http.post(url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::DeliveryFailed(format!(
                "webhook returned HTTP {status}: {body}"
            )));
        }

        debug!(date = %report.date, "Daily report delivered");
        Ok(())
    }
}

/// Recording sink for tests: remembers every report it was handed.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reports: std::sync::Mutex<Vec<DailyReport>>,
    fail: std::sync::Mutex<bool>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery fail.
    pub fn fail_deliveries(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Every report received, in order.
    pub fn reports(&self) -> Vec<DailyReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportSink for RecordingReporter {
    async fn send_report(&self, report: &DailyReport) -> Result<(), ReportError> {
        self.reports.lock().unwrap().push(report.clone());
        if *self.fail.lock().unwrap() {
            return Err(ReportError::DeliveryFailed(
                "scripted delivery failure".to_string(),
            ));
        }
        Ok(())
    }
}
