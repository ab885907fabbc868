//! Settlement engine
//!
//! Whole-market settlement as one logical operation: a single atomic
//! market transition followed by a per-bet resolution fan-out. The market
//! step is exactly-once (conditional update); the fan-out is idempotent
//! per bet and isolated per bet, so one failing update never aborts the
//! rest. Stragglers surface in the report for operators to re-drive.

use serde::Serialize;
use std::time::Instant;

use crate::domain::{BetId, BetStatus, MarketId};
use crate::error::{Error, Result};
use crate::ledger::BetLedger;
use crate::market::MarketService;
use crate::telemetry::{increment, record_settlement_duration, CounterMetric};

/// Outcome of one settlement run
#[derive(Debug, Clone, Serialize)]
pub struct SettlementReport {
    /// Market that was settled
    pub market_id: MarketId,
    /// Declared winning outcome key
    pub winning_key: String,
    /// Bets whose resolution was persisted
    pub bets_settled: usize,
    /// Of those, bets resolved to won
    pub bets_won: usize,
    /// Of those, bets resolved to lost
    pub bets_lost: usize,
    /// Bets whose store update failed; safe to re-resolve individually
    pub failed_bet_ids: Vec<BetId>,
}

/// Orchestrates market closure and bulk bet resolution
pub struct SettlementEngine {
    markets: MarketService,
    ledger: BetLedger,
}

impl SettlementEngine {
    /// Create an engine over the lifecycle manager and ledger
    pub fn new(markets: MarketService, ledger: BetLedger) -> Self {
        Self { markets, ledger }
    }

    /// Settle a market against a winning outcome and resolve all its bets
    ///
    /// The winning key must be one of the market's own outcome keys;
    /// a foreign key is rejected before any write. The open -> settled
    /// transition happens before the fan-out and aborts the whole
    /// operation if the market is not open, so no bet is touched.
    pub async fn settle_market(
        &self,
        market_id: MarketId,
        winning_key: &str,
    ) -> Result<SettlementReport> {
        let started = Instant::now();

        let market = self.markets.get(market_id).await?;
        if market.outcome(winning_key).is_none() {
            return Err(Error::InvalidOutcome);
        }

        self.markets.mark_settled(&market, winning_key).await?;

        // Unbounded fan-out over every bet on the market. Each bet is
        // resolved independently; a failing update is recorded and the
        // loop keeps going so settlement makes maximal progress.
        let bets = self.ledger.bets_for_market(market_id).await?;
        let mut report = SettlementReport {
            market_id,
            winning_key: winning_key.to_string(),
            bets_settled: 0,
            bets_won: 0,
            bets_lost: 0,
            failed_bet_ids: Vec::new(),
        };

        for bet in &bets {
            match self.ledger.resolve_bet(bet, winning_key).await {
                Ok(BetStatus::Won) => {
                    report.bets_settled += 1;
                    report.bets_won += 1;
                }
                Ok(_) => {
                    report.bets_settled += 1;
                    report.bets_lost += 1;
                }
                Err(e) => {
                    tracing::warn!(bet_id = %bet.id, error = %e, "Bet resolution failed");
                    report.failed_bet_ids.push(bet.id);
                }
            }
        }

        increment(CounterMetric::MarketsSettled);
        record_settlement_duration(started.elapsed());
        tracing::info!(
            market_id = %market_id,
            winning_key,
            bets_settled = report.bets_settled,
            bets_won = report.bets_won,
            bets_lost = report.bets_lost,
            failed = report.failed_bet_ids.len(),
            "Market settlement complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarketStatus;
    use crate::ledger::PlaceBet;
    use crate::market::{NewMarket, OutcomeSpec};
    use crate::store::{MarketStore, MemoryStore};
    use crate::users::UserService;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<MemoryStore>,
        engine: SettlementEngine,
        markets: MarketService,
        ledger: BetLedger,
        users: UserService,
    }

    fn ledger_over(store: &Arc<MemoryStore>) -> BetLedger {
        BetLedger::new(
            store.clone(),
            store.clone(),
            MarketService::new(store.clone()),
        )
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        Fixture {
            engine: SettlementEngine::new(MarketService::new(store.clone()), ledger_over(&store)),
            markets: MarketService::new(store.clone()),
            ledger: ledger_over(&store),
            users: UserService::new(store.clone()),
            store,
        }
    }

    async fn cricket_market(markets: &MarketService) -> crate::domain::Market {
        markets
            .create_market(NewMarket {
                game_type: "cricket".to_string(),
                title: "A vs B".to_string(),
                outcomes: vec![
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
                ],
                start_time: None,
            })
            .await
            .unwrap()
    }

    async fn bet_on(
        fx: &Fixture,
        user: crate::domain::UserId,
        market: crate::domain::MarketId,
        key: &str,
        stake: Decimal,
    ) -> crate::domain::Bet {
        fx.ledger
            .place_bet(PlaceBet {
                user_id: user,
                market_id: market,
                outcome_key: key.to_string(),
                stake,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_settlement_resolves_winners_and_losers() {
        let fx = fixture();
        let market = cricket_market(&fx.markets).await;
        let user = fx.users.create_user("alice", None).await.unwrap();

        let winner = bet_on(&fx, user.id, market.id, "A", dec!(100)).await;
        let loser = bet_on(&fx, user.id, market.id, "B", dec!(50)).await;
        assert_eq!(winner.potential_payout, dec!(180.00));
        assert_eq!(loser.potential_payout, dec!(100.00));

        let report = fx.engine.settle_market(market.id, "A").await.unwrap();
        assert_eq!(report.bets_settled, 2);
        assert_eq!(report.bets_won, 1);
        assert_eq!(report.bets_lost, 1);
        assert!(report.failed_bet_ids.is_empty());

        let bets = fx.ledger.bets_for_market(market.id).await.unwrap();
        let won = bets.iter().find(|b| b.id == winner.id).unwrap();
        let lost = bets.iter().find(|b| b.id == loser.id).unwrap();
        assert_eq!(won.status, BetStatus::Won);
        assert_eq!(lost.status, BetStatus::Lost);

        let settled = fx.markets.get(market.id).await.unwrap();
        assert_eq!(settled.status, MarketStatus::Settled);
        assert_eq!(settled.settled_outcome_key.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_settlement_with_zero_bets() {
        let fx = fixture();
        let market = cricket_market(&fx.markets).await;

        let report = fx.engine.settle_market(market.id, "B").await.unwrap();
        assert_eq!(report.bets_settled, 0);
        assert_eq!(report.bets_won, 0);
        assert_eq!(report.bets_lost, 0);

        let settled = fx.markets.get(market.id).await.unwrap();
        assert_eq!(settled.status, MarketStatus::Settled);
    }

    #[tokio::test]
    async fn test_settlement_rejects_foreign_winning_key() {
        let fx = fixture();
        let market = cricket_market(&fx.markets).await;
        let user = fx.users.create_user("alice", None).await.unwrap();
        bet_on(&fx, user.id, market.id, "A", dec!(10)).await;

        let err = fx.engine.settle_market(market.id, "C").await.unwrap_err();
        assert!(matches!(err, Error::InvalidOutcome));

        // Nothing was written
        let market = fx.markets.get(market.id).await.unwrap();
        assert_eq!(market.status, MarketStatus::Open);
        let bets = fx.ledger.bets_for_market(market.id).await.unwrap();
        assert_eq!(bets[0].status, BetStatus::Pending);
    }

    #[tokio::test]
    async fn test_double_settlement_rejected_without_bet_mutations() {
        let fx = fixture();
        let market = cricket_market(&fx.markets).await;
        let user = fx.users.create_user("alice", None).await.unwrap();
        bet_on(&fx, user.id, market.id, "A", dec!(10)).await;

        fx.engine.settle_market(market.id, "A").await.unwrap();
        let err = fx.engine.settle_market(market.id, "B").await.unwrap_err();
        assert!(matches!(err, Error::MarketNotOpen));

        // The first resolution stands
        let bets = fx.ledger.bets_for_market(market.id).await.unwrap();
        assert_eq!(bets[0].status, BetStatus::Won);
        let settled = fx.markets.get(market.id).await.unwrap();
        assert_eq!(settled.settled_outcome_key.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_settlement_unknown_market() {
        let fx = fixture();
        let err = fx
            .engine
            .settle_market(MarketId::new_v4(), "A")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MarketNotFound));
    }

    #[tokio::test]
    async fn test_settlement_leaves_other_markets_alone() {
        let fx = fixture();
        let settled_market = cricket_market(&fx.markets).await;
        let other_market = cricket_market(&fx.markets).await;
        let user = fx.users.create_user("alice", None).await.unwrap();

        bet_on(&fx, user.id, settled_market.id, "A", dec!(10)).await;
        let untouched = bet_on(&fx, user.id, other_market.id, "A", dec!(10)).await;

        fx.engine.settle_market(settled_market.id, "A").await.unwrap();

        let bets = fx.ledger.bets_for_market(other_market.id).await.unwrap();
        assert_eq!(bets[0].id, untouched.id);
        assert_eq!(bets[0].status, BetStatus::Pending);
        assert!(MarketStore::find(fx.store.as_ref(), other_market.id)
            .await
            .unwrap()
            .unwrap()
            .is_open());
    }
}
