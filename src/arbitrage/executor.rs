//! Two-leg arbitrage execution with rollback on partial failure.

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::ledger::Ledger;
use crate::market::client::{ExchangeApi, OrderTicket};
use crate::market::types::{MarketPair, Outcome};

/// What happened to the already-executed leg after the other leg failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// No leg had executed yet; nothing to unwind.
    NotNeeded,
    /// Cancellation of the executed leg was accepted.
    Cancelled {
        /// The cancelled order.
        order_id: String,
    },
    /// Cancellation was attempted and failed. The market may have already
    /// settled the resting side; this is an acknowledged residual risk and
    /// is never escalated.
    CancelFailed {
        /// The order that could not be cancelled.
        order_id: String,
        /// Reason reported by the exchange.
        reason: String,
    },
}

/// Result of one two-leg execution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Both legs filled; profit and cost are booked in the ledger.
    Completed {
        /// Profit booked after the fee haircut.
        profit: Decimal,
        /// Capital spent on both legs.
        cost: Decimal,
        /// NO-leg order id.
        no_order_id: String,
        /// YES-leg order id.
        yes_order_id: String,
    },
    /// A leg was rejected or faulted; the ledger is untouched.
    Aborted {
        /// The leg that failed.
        failed_leg: Outcome,
        /// Unwind result for the other leg.
        cleanup: Cleanup,
    },
}

impl ExecutionOutcome {
    /// Whether both legs filled.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed { .. })
    }
}

/// Execute both legs of a detected opportunity.
///
/// The legs are strictly sequential, NO leg first then YES leg, so a failed
/// first leg is known before the second is risked. On any leg failure the
/// already-executed leg (if any) gets a best-effort cancellation and the
/// attempt resolves to [`ExecutionOutcome::Aborted`] with the ledger
/// untouched. Only a full two-leg fill books profit, cost, and the trade
/// counter, applied as one ledger transition.
#[instrument(skip_all, fields(question = %pair.question))]
pub async fn execute_pair<A: ExchangeApi + ?Sized>(
    api: &A,
    pair: &MarketPair,
    yes_price: Decimal,
    no_price: Decimal,
    config: &Config,
    ledger: &mut Ledger,
) -> ExecutionOutcome {
    let legs = [
        (Outcome::No, pair.no_token_id.as_str(), no_price),
        (Outcome::Yes, pair.yes_token_id.as_str(), yes_price),
    ];

    let mut filled: Vec<(Outcome, String)> = Vec::with_capacity(2);

    for (leg, token_id, price) in legs {
        let ticket = OrderTicket::buy(token_id, price, config.shares_per_trade);

        let receipt = match api.submit_order(&ticket).await {
            Ok(receipt) if receipt.is_success() => receipt,
            Ok(receipt) => {
                warn!(
                    leg = %leg,
                    error = receipt.error.as_deref().unwrap_or("no error detail"),
                    "Leg rejected"
                );
                return abort(api, leg, filled.pop()).await;
            }
            Err(e) => {
                warn!(leg = %leg, error = %e, "Leg submission faulted");
                return abort(api, leg, filled.pop()).await;
            }
        };

        let order_id = receipt.order_id.unwrap_or_default();
        info!(
            leg = %leg,
            order_id = %order_id,
            price = %price,
            size = %config.shares_per_trade,
            "Leg filled"
        );
        filled.push((leg, order_id));
    }

    let combined = yes_price + no_price;
    let edge_per_share = Decimal::ONE - combined - config.fee_rate;
    let profit = config.shares_per_trade * edge_per_share;
    let cost = config.shares_per_trade * combined;

    ledger.record_fill(profit, cost);

    info!(
        profit = %profit,
        cost = %cost,
        daily_profit = %ledger.daily_profit,
        total_profit = %ledger.total_profit,
        "LOCKED PROFIT"
    );

    let mut ids = filled.into_iter();
    let (_, no_order_id) = ids.next().expect("no leg recorded");
    let (_, yes_order_id) = ids.next().expect("yes leg recorded");

    ExecutionOutcome::Completed {
        profit,
        cost,
        no_order_id,
        yes_order_id,
    }
}

/// Unwind the already-executed leg, if there is one, and report the abort.
async fn abort<A: ExchangeApi + ?Sized>(
    api: &A,
    failed_leg: Outcome,
    executed: Option<(Outcome, String)>,
) -> ExecutionOutcome {
    let cleanup = match executed {
        None => Cleanup::NotNeeded,
        Some((leg, order_id)) => match api.cancel_order(&order_id).await {
            Ok(()) => {
                info!(leg = %leg, order_id = %order_id, "Executed leg cancelled");
                Cleanup::Cancelled { order_id }
            }
            Err(e) => {
                warn!(
                    leg = %leg,
                    order_id = %order_id,
                    error = %e,
                    "Cancellation of executed leg failed; position may be resting"
                );
                Cleanup::CancelFailed {
                    order_id,
                    reason: e.to_string(),
                }
            }
        },
    };

    ExecutionOutcome::Aborted {
        failed_leg,
        cleanup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::market::mock::MockExchange;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use time::macros::date;

    fn test_pair() -> MarketPair {
        MarketPair {
            question: "Bitcoin up in the next 15 minutes?".to_string(),
            yes_token_id: "yes-tok".to_string(),
            no_token_id: "no-tok".to_string(),
        }
    }

    fn test_ledger() -> Ledger {
        Ledger::new(date!(2026 - 08 - 06))
    }

    #[tokio::test]
    async fn both_legs_fill_and_book_exact_economics() {
        let api = MockExchange::new();
        let config = test_config();
        let mut ledger = test_ledger();
        let pair = test_pair();

        // p_yes=0.45, p_no=0.50, size=25, fee=0.02
        let outcome =
            execute_pair(&api, &pair, dec!(0.45), dec!(0.50), &config, &mut ledger).await;

        match outcome {
            ExecutionOutcome::Completed { profit, cost, .. } => {
                assert_eq!(profit, dec!(0.75));
                assert_eq!(cost, dec!(23.75));
            }
            other => panic!("expected Completed, got {other:?}"),
        }

        assert_eq!(ledger.daily_profit, dec!(0.75));
        assert_eq!(ledger.total_profit, dec!(0.75));
        assert_eq!(ledger.invested, dec!(23.75));
        assert_eq!(ledger.successful_trades, 1);
    }

    #[tokio::test]
    async fn legs_are_submitted_no_first_then_yes() {
        let api = MockExchange::new();
        let config = test_config();
        let mut ledger = test_ledger();

        execute_pair(&api, &test_pair(), dec!(0.45), dec!(0.50), &config, &mut ledger).await;

        let submitted = api.submitted();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0].token_id, "no-tok");
        assert_eq!(submitted[1].token_id, "yes-tok");
        assert_eq!(submitted[0].price, dec!(0.50));
        assert_eq!(submitted[1].price, dec!(0.45));
    }

    #[tokio::test]
    async fn first_leg_rejection_stops_before_second_leg() {
        let api = MockExchange::new();
        api.reject_orders_for("no-tok");
        let config = test_config();
        let mut ledger = test_ledger();

        let outcome =
            execute_pair(&api, &test_pair(), dec!(0.45), dec!(0.50), &config, &mut ledger).await;

        assert_eq!(
            outcome,
            ExecutionOutcome::Aborted {
                failed_leg: Outcome::No,
                cleanup: Cleanup::NotNeeded,
            }
        );
        // Only the NO leg was ever submitted; YES was never risked.
        assert_eq!(api.submitted().len(), 1);
        assert!(api.cancelled().is_empty());
        assert_eq!(ledger.successful_trades, 0);
        assert_eq!(ledger.daily_profit, dec!(0));
        assert_eq!(ledger.invested, dec!(0));
    }

    #[tokio::test]
    async fn second_leg_failure_cancels_first_leg() {
        let api = MockExchange::new();
        api.reject_orders_for("yes-tok");
        let config = test_config();
        let mut ledger = test_ledger();

        let outcome =
            execute_pair(&api, &test_pair(), dec!(0.45), dec!(0.50), &config, &mut ledger).await;

        match outcome {
            ExecutionOutcome::Aborted {
                failed_leg,
                cleanup,
            } => {
                assert_eq!(failed_leg, Outcome::Yes);
                assert_eq!(
                    cleanup,
                    Cleanup::Cancelled {
                        order_id: "ord-1".to_string()
                    }
                );
            }
            other => panic!("expected Aborted, got {other:?}"),
        }

        assert_eq!(api.cancelled(), vec!["ord-1".to_string()]);
        assert_eq!(ledger.successful_trades, 0);
        assert_eq!(ledger.total_profit, dec!(0));
    }

    #[tokio::test]
    async fn failed_cancellation_is_swallowed_and_ledger_untouched() {
        let api = MockExchange::new();
        api.reject_orders_for("yes-tok");
        api.fail_cancellations(true);
        let config = test_config();
        let mut ledger = test_ledger();

        let outcome =
            execute_pair(&api, &test_pair(), dec!(0.45), dec!(0.50), &config, &mut ledger).await;

        match outcome {
            ExecutionOutcome::Aborted { cleanup, .. } => match cleanup {
                Cleanup::CancelFailed { order_id, .. } => assert_eq!(order_id, "ord-1"),
                other => panic!("expected CancelFailed, got {other:?}"),
            },
            other => panic!("expected Aborted, got {other:?}"),
        }

        // Cancellation was attempted even though it failed.
        assert_eq!(api.cancelled(), vec!["ord-1".to_string()]);
        assert_eq!(ledger.successful_trades, 0);
        assert_eq!(ledger.daily_profit, dec!(0));
        assert_eq!(ledger.invested, dec!(0));
    }

    #[tokio::test]
    async fn transport_fault_is_treated_like_a_rejection() {
        let api = MockExchange::new();
        api.fault_orders_for("yes-tok");
        let config = test_config();
        let mut ledger = test_ledger();

        let outcome =
            execute_pair(&api, &test_pair(), dec!(0.45), dec!(0.50), &config, &mut ledger).await;

        match outcome {
            ExecutionOutcome::Aborted {
                failed_leg,
                cleanup,
            } => {
                assert_eq!(failed_leg, Outcome::Yes);
                assert!(matches!(cleanup, Cleanup::Cancelled { .. }));
            }
            other => panic!("expected Aborted, got {other:?}"),
        }
        assert_eq!(ledger.successful_trades, 0);
    }
}
