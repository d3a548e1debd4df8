//! Market-related types for binary yes/no prediction markets.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Outcome side of a binary market.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// YES token.
    #[strum(serialize = "yes", serialize = "YES")]
    #[default]
    Yes,
    /// NO token.
    #[strum(serialize = "no", serialize = "NO")]
    No,
}

impl Outcome {
    /// Get the opposite outcome.
    pub fn opposite(&self) -> Self {
        match self {
            Outcome::Yes => Outcome::No,
            Outcome::No => Outcome::Yes,
        }
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order.
    #[strum(serialize = "BUY", serialize = "buy")]
    Buy,
    /// Sell order.
    #[strum(serialize = "SELL", serialize = "sell")]
    Sell,
}

/// One tradable arbitrage candidate: a question with its two outcome tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketPair {
    /// Market question text; unique key within the catalog.
    pub question: String,
    /// YES token ID for the CLOB.
    pub yes_token_id: String,
    /// NO token ID for the CLOB.
    pub no_token_id: String,
}

impl MarketPair {
    /// Build a pair from the exchange's token-id list.
    ///
    /// The upstream convention is index 0 = NO, index 1 = YES. Reversing
    /// this silently inverts the trade direction, so the mapping lives in
    /// exactly one place and is pinned by a test. Returns `None` unless the
    /// list holds exactly two distinct ids.
    pub fn from_token_ids(question: impl Into<String>, token_ids: &[String]) -> Option<Self> {
        match token_ids {
            [no_id, yes_id] if no_id != yes_id => Some(Self {
                question: question.into(),
                yes_token_id: yes_id.clone(),
                no_token_id: no_id.clone(),
            }),
            _ => None,
        }
    }

    /// Get the token ID for a given outcome.
    pub fn token_id(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::Yes => &self.yes_token_id,
            Outcome::No => &self.no_token_id,
        }
    }
}

/// Raw market entry from the simplified-markets endpoint.
///
/// `clob_token_ids` arrives as a JSON-encoded string array, exactly as the
/// exchange serves it; the catalog decodes it during admission.
#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedMarket {
    /// Market question text.
    pub question: Option<String>,
    /// Whether the market is currently tradable.
    pub active: Option<bool>,
    /// JSON-encoded list of CLOB token IDs.
    #[serde(rename = "clobTokenIds")]
    pub clob_token_ids: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_opposite_works() {
        assert_eq!(Outcome::Yes.opposite(), Outcome::No);
        assert_eq!(Outcome::No.opposite(), Outcome::Yes);
    }

    #[test]
    fn outcome_from_string_works() {
        use std::str::FromStr;
        assert_eq!(Outcome::from_str("yes").unwrap(), Outcome::Yes);
        assert_eq!(Outcome::from_str("no").unwrap(), Outcome::No);
        assert_eq!(Outcome::from_str("YES").unwrap(), Outcome::Yes);
    }

    #[test]
    fn pair_maps_first_id_to_no_and_second_to_yes() {
        let ids = vec!["token-a".to_string(), "token-b".to_string()];
        let pair = MarketPair::from_token_ids("Will it rain?", &ids).unwrap();

        assert_eq!(pair.no_token_id, "token-a");
        assert_eq!(pair.yes_token_id, "token-b");
        assert_eq!(pair.token_id(Outcome::No), "token-a");
        assert_eq!(pair.token_id(Outcome::Yes), "token-b");
    }

    #[test]
    fn pair_rejects_wrong_token_count() {
        let one = vec!["only".to_string()];
        let three = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        assert!(MarketPair::from_token_ids("q", &one).is_none());
        assert!(MarketPair::from_token_ids("q", &three).is_none());
        assert!(MarketPair::from_token_ids("q", &[]).is_none());
    }

    #[test]
    fn pair_rejects_duplicate_token_ids() {
        let dup = vec!["same".to_string(), "same".to_string()];
        assert!(MarketPair::from_token_ids("q", &dup).is_none());
    }

    #[test]
    fn simplified_market_parses_exchange_shape() {
        let json = r#"{
            "question": "Bitcoin up in the next 15 minutes?",
            "active": true,
            "clobTokenIds": "[\"111\", \"222\"]"
        }"#;

        let market: SimplifiedMarket = serde_json::from_str(json).unwrap();
        assert_eq!(market.active, Some(true));
        assert_eq!(market.clob_token_ids.as_deref(), Some("[\"111\", \"222\"]"));
    }
}
