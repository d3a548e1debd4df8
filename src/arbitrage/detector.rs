//! Arbitrage opportunity detection.

use rust_decimal::Decimal;

/// Detected opportunity for one market pair.
///
/// Exists only within the scan iteration that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opportunity {
    /// Quoted YES buy price.
    pub yes_price: Decimal,
    /// Quoted NO buy price.
    pub no_price: Decimal,
    /// Sum of both buy prices.
    pub combined: Decimal,
    /// Theoretical payout margin before fees: `1 - combined`.
    pub edge: Decimal,
}

/// Check a pair of live prices against the arbitrage threshold.
///
/// An opportunity exists iff `yes + no < threshold`, strictly. The edge is
/// carried for observability only; the threshold comparison is the sole
/// acceptance test. Pure function of its inputs.
pub fn detect(yes_price: Decimal, no_price: Decimal, threshold: Decimal) -> Option<Opportunity> {
    let combined = yes_price + no_price;

    if combined >= threshold {
        return None;
    }

    Some(Opportunity {
        yes_price,
        no_price,
        combined,
        edge: Decimal::ONE - combined,
    })
}
