//! Keyword-filtered catalog of tradable market pairs.

use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::error::MarketError;

use super::client::ExchangeApi;
use super::types::{MarketPair, SimplifiedMarket};

/// In-memory set of tradable pairs, keyed by question text.
///
/// The catalog is replaced wholesale on every successful refresh; a market
/// absent from the latest listing is gone. A failed refresh leaves the
/// previous contents untouched.
#[derive(Debug, Default)]
pub struct Catalog {
    pairs: HashMap<String, MarketPair>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pairs currently admitted.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Clone the current pairs for one scan pass, so a refresh mid-tick
    /// cannot affect an in-progress iteration.
    pub fn snapshot(&self) -> Vec<MarketPair> {
        self.pairs.values().cloned().collect()
    }

    /// Refresh from the exchange listing, keeping only markets that pass
    /// [`admit`]. Returns the new pair count.
    #[instrument(skip(self, api, keywords))]
    pub async fn refresh<A: ExchangeApi + ?Sized>(
        &mut self,
        api: &A,
        keywords: &[String],
    ) -> Result<usize, MarketError> {
        let markets = api.list_markets().await?;
        let total = markets.len();

        let fresh: HashMap<String, MarketPair> = markets
            .into_iter()
            .filter_map(|market| admit(market, keywords))
            .map(|pair| (pair.question.clone(), pair))
            .collect();

        debug!(listed = total, admitted = fresh.len(), "Filtered market listing");

        self.pairs = fresh;
        info!(pairs = self.pairs.len(), "Refreshed market catalog");

        Ok(self.pairs.len())
    }
}

/// Admission rule for one raw market.
///
/// A market enters the catalog iff its question contains every keyword
/// (case-insensitive), its active flag is set, and its token-id list
/// decodes to exactly two distinct entries (index 0 = NO, index 1 = YES).
pub fn admit(market: SimplifiedMarket, keywords: &[String]) -> Option<MarketPair> {
    let question = market.question?;
    let lowered = question.to_lowercase();

    if !keywords
        .iter()
        .all(|keyword| lowered.contains(&keyword.to_lowercase()))
    {
        return None;
    }

    if !market.active.unwrap_or(false) {
        return None;
    }

    let token_ids: Vec<String> = serde_json::from_str(market.clob_token_ids.as_deref()?).ok()?;

    MarketPair::from_token_ids(question, &token_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::mock::MockExchange;

    fn keywords() -> Vec<String> {
        vec!["bitcoin".to_string(), "15 minute".to_string()]
    }

    fn raw_market(question: &str, active: bool, token_ids: &str) -> SimplifiedMarket {
        SimplifiedMarket {
            question: Some(question.to_string()),
            active: Some(active),
            clob_token_ids: Some(token_ids.to_string()),
        }
    }

    #[test]
    fn admit_accepts_matching_active_two_token_market() {
        let market = raw_market(
            "Bitcoin up in the next 15 minutes?",
            true,
            r#"["no-tok", "yes-tok"]"#,
        );

        let pair = admit(market, &keywords()).unwrap();
        assert_eq!(pair.no_token_id, "no-tok");
        assert_eq!(pair.yes_token_id, "yes-tok");
    }

    #[test]
    fn admit_is_case_insensitive() {
        let market = raw_market(
            "BITCOIN up in the next 15 MINUTE window?",
            true,
            r#"["a", "b"]"#,
        );
        assert!(admit(market, &keywords()).is_some());
    }

    #[test]
    fn admit_rejects_missing_keyword() {
        let market = raw_market("Ethereum up in the next 15 minutes?", true, r#"["a", "b"]"#);
        assert!(admit(market, &keywords()).is_none());
    }

    #[test]
    fn admit_rejects_inactive_market() {
        let market = raw_market(
            "Bitcoin up in the next 15 minutes?",
            false,
            r#"["a", "b"]"#,
        );
        assert!(admit(market, &keywords()).is_none());
    }

    #[test]
    fn admit_rejects_three_token_market() {
        let market = raw_market(
            "Bitcoin up in the next 15 minutes?",
            true,
            r#"["a", "b", "c"]"#,
        );
        assert!(admit(market, &keywords()).is_none());
    }

    #[test]
    fn admit_rejects_undecodable_token_list() {
        let market = raw_market("Bitcoin up in the next 15 minutes?", true, "not json");
        assert!(admit(market, &keywords()).is_none());
    }

    #[tokio::test]
    async fn refresh_replaces_catalog_wholesale() {
        let api = MockExchange::new();
        api.set_markets(vec![raw_market(
            "Bitcoin up in the next 15 minutes?",
            true,
            r#"["n1", "y1"]"#,
        )]);

        let mut catalog = Catalog::new();
        catalog.refresh(&api, &keywords()).await.unwrap();
        assert_eq!(catalog.len(), 1);

        api.set_markets(vec![raw_market(
            "Bitcoin down in the next 15 minutes?",
            true,
            r#"["n2", "y2"]"#,
        )]);

        catalog.refresh(&api, &keywords()).await.unwrap();
        let pairs = catalog.snapshot();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "Bitcoin down in the next 15 minutes?");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_catalog() {
        let api = MockExchange::new();
        api.set_markets(vec![raw_market(
            "Bitcoin up in the next 15 minutes?",
            true,
            r#"["n1", "y1"]"#,
        )]);

        let mut catalog = Catalog::new();
        catalog.refresh(&api, &keywords()).await.unwrap();
        assert_eq!(catalog.len(), 1);

        api.fail_market_listing(true);
        assert!(catalog.refresh(&api, &keywords()).await.is_err());
        assert_eq!(catalog.len(), 1, "previous catalog must survive a failed refresh");
    }
}
