//! Market lifecycle
//!
//! Owns market creation validation and the open -> settled transition.
//! Placement and settlement both gate on market state through this module.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{GameType, Market, MarketId, MarketStatus, Outcome};
use crate::error::{Error, Result};
use crate::store::MarketStore;
use crate::telemetry::{increment, CounterMetric};

/// Default page size for market listings
pub const MARKET_PAGE_LIMIT: usize = 100;

/// Raw outcome fields as they arrive from the transport layer
#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeSpec {
    pub key: String,
    pub label: String,
    pub odds: Decimal,
}

/// Market creation input
#[derive(Debug, Clone, Deserialize)]
pub struct NewMarket {
    pub game_type: String,
    pub title: String,
    pub outcomes: Vec<OutcomeSpec>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

/// Fail unless the market is open
pub fn require_open(market: &Market) -> Result<()> {
    if market.is_open() {
        Ok(())
    } else {
        Err(Error::MarketNotOpen)
    }
}

/// Market lifecycle manager
pub struct MarketService {
    store: Arc<dyn MarketStore>,
    page_limit: usize,
}

impl MarketService {
    /// Create a service over the given store
    pub fn new(store: Arc<dyn MarketStore>) -> Self {
        Self {
            store,
            page_limit: MARKET_PAGE_LIMIT,
        }
    }

    /// Override the listing page size
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit;
        self
    }

    /// Validate and persist a new market with status open
    ///
    /// Outcomes are checked once here: non-empty list, complete fields,
    /// odds above 1.0, keys unique within the market. Order is preserved.
    pub async fn create_market(&self, input: NewMarket) -> Result<Market> {
        let game_type = GameType::parse(&input.game_type)?;
        if input.outcomes.is_empty() {
            return Err(Error::EmptyOutcomes);
        }

        let mut seen = HashSet::new();
        let mut outcomes = Vec::with_capacity(input.outcomes.len());
        for spec in input.outcomes {
            let outcome = Outcome::new(spec.key, spec.label, spec.odds)?;
            if !seen.insert(outcome.key.clone()) {
                return Err(Error::DuplicateOutcomeKey(outcome.key));
            }
            outcomes.push(outcome);
        }

        let market = Market {
            id: MarketId::new_v4(),
            game_type,
            title: input.title,
            outcomes,
            status: MarketStatus::Open,
            start_time: input.start_time,
            created_at: Utc::now(),
            settled_outcome_key: None,
            settled_at: None,
        };

        self.store.insert(market.clone()).await?;
        increment(CounterMetric::MarketsCreated);
        tracing::info!(
            market_id = %market.id,
            game_type = game_type.as_str(),
            outcomes = market.outcomes.len(),
            "Market created"
        );
        Ok(market)
    }

    /// Load a market or fail with MarketNotFound
    pub async fn get(&self, id: MarketId) -> Result<Market> {
        self.store.find(id).await?.ok_or(Error::MarketNotFound)
    }

    /// List markets, optionally filtered by game type
    pub async fn list(&self, game_type: Option<&str>) -> Result<Vec<Market>> {
        let filter = game_type.map(GameType::parse).transpose()?;
        Ok(self.store.list(filter, self.page_limit).await?)
    }

    /// Transition a market open -> settled in one conditional update
    ///
    /// Takes the already-loaded market so existence is established by the
    /// `get` that produced it; settlement costs a single store read. A
    /// market that is not open (already settled, or closed) fails with
    /// MarketNotOpen; settlement is never idempotent. The conditional
    /// store write means two racing callers cannot both pass.
    pub async fn mark_settled(&self, market: &Market, winning_key: &str) -> Result<Market> {
        self.store
            .settle_if_open(market.id, winning_key, Utc::now())
            .await?
            .ok_or(Error::MarketNotOpen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn service() -> MarketService {
        MarketService::new(Arc::new(MemoryStore::new()))
    }

    fn two_outcomes() -> Vec<OutcomeSpec> {
        vec![
            OutcomeSpec {
                key: "A".to_string(),
                label: "Team A".to_string(),
                odds: dec!(1.8),
            },
            OutcomeSpec {
                key: "B".to_string(),
                label: "Team B".to_string(),
                odds: dec!(2.0),
            },
        ]
    }

    fn new_market(game_type: &str, outcomes: Vec<OutcomeSpec>) -> NewMarket {
        NewMarket {
            game_type: game_type.to_string(),
            title: "A vs B".to_string(),
            outcomes,
            start_time: None,
        }
    }

    #[tokio::test]
    async fn test_create_market_opens_with_ordered_outcomes() {
        let service = service();
        let market = service
            .create_market(new_market("cricket", two_outcomes()))
            .await
            .unwrap();

        assert_eq!(market.status, MarketStatus::Open);
        assert_eq!(market.game_type, GameType::Cricket);
        assert_eq!(market.outcomes[0].key, "A");
        assert_eq!(market.outcomes[1].key, "B");
        assert!(market.settled_outcome_key.is_none());

        let found = service.get(market.id).await.unwrap();
        assert_eq!(found.title, "A vs B");
    }

    #[tokio::test]
    async fn test_create_market_rejects_bad_game_type() {
        let err = service()
            .create_market(new_market("roulette", two_outcomes()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGameType(_)));
    }

    #[tokio::test]
    async fn test_create_market_rejects_empty_outcomes() {
        let err = service()
            .create_market(new_market("matka", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyOutcomes));
    }

    #[tokio::test]
    async fn test_create_market_rejects_incomplete_outcome() {
        let mut outcomes = two_outcomes();
        outcomes[1].label = String::new();
        let err = service()
            .create_market(new_market("cricket", outcomes))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::IncompleteOutcome));
    }

    #[tokio::test]
    async fn test_create_market_rejects_low_odds() {
        let mut outcomes = two_outcomes();
        outcomes[0].odds = dec!(1.0);
        let err = service()
            .create_market(new_market("cricket", outcomes))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOdds(_)));
    }

    #[tokio::test]
    async fn test_create_market_rejects_duplicate_keys() {
        let mut outcomes = two_outcomes();
        outcomes[1].key = "A".to_string();
        let err = service()
            .create_market(new_market("cricket", outcomes))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateOutcomeKey(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_game_type() {
        let service = service();
        service
            .create_market(new_market("cricket", two_outcomes()))
            .await
            .unwrap();
        service
            .create_market(new_market("matka", two_outcomes()))
            .await
            .unwrap();

        assert_eq!(service.list(Some("cricket")).await.unwrap().len(), 1);
        assert_eq!(service.list(None).await.unwrap().len(), 2);
        assert!(matches!(
            service.list(Some("poker")).await.unwrap_err(),
            Error::InvalidGameType(_)
        ));
    }

    #[tokio::test]
    async fn test_mark_settled_once() {
        let service = service();
        let market = service
            .create_market(new_market("cricket", two_outcomes()))
            .await
            .unwrap();

        let settled = service.mark_settled(&market, "A").await.unwrap();
        assert_eq!(settled.status, MarketStatus::Settled);
        assert_eq!(settled.settled_outcome_key.as_deref(), Some("A"));

        let err = service.mark_settled(&settled, "A").await.unwrap_err();
        assert!(matches!(err, Error::MarketNotOpen));
    }

    #[tokio::test]
    async fn test_get_missing_market() {
        let err = service().get(MarketId::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::MarketNotFound));
    }

    #[tokio::test]
    async fn test_require_open() {
        let service = service();
        let market = service
            .create_market(new_market("other", two_outcomes()))
            .await
            .unwrap();
        assert!(require_open(&market).is_ok());

        let settled = service.mark_settled(&market, "B").await.unwrap();
        assert!(matches!(require_open(&settled), Err(Error::MarketNotOpen)));
    }
}
