//! Bet ledger
//!
//! Records bet placements with frozen odds and owns the pending ->
//! won/lost transition applied at settlement. No wallet debit or credit
//! happens here; balances are informational.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::{potential_payout, Bet, BetId, BetStatus, MarketId, UserId};
use crate::error::{Error, Result};
use crate::market::{require_open, MarketService};
use crate::store::{BetStore, UserStore};
use crate::telemetry::{increment, CounterMetric};

/// Default page size for per-user bet listings
pub const BET_PAGE_LIMIT: usize = 200;

/// Bet placement input, ids already parsed at the boundary
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceBet {
    pub user_id: UserId,
    pub market_id: MarketId,
    pub outcome_key: String,
    pub stake: Decimal,
}

/// Pure resolution rule: a bet wins iff it backed the winning outcome
pub fn resolve_status(bet: &Bet, winning_key: &str) -> BetStatus {
    if bet.outcome_key == winning_key {
        BetStatus::Won
    } else {
        BetStatus::Lost
    }
}

/// Records and resolves bets
pub struct BetLedger {
    users: Arc<dyn UserStore>,
    bets: Arc<dyn BetStore>,
    markets: MarketService,
    page_limit: usize,
}

impl BetLedger {
    /// Create a ledger over the given stores
    pub fn new(users: Arc<dyn UserStore>, bets: Arc<dyn BetStore>, markets: MarketService) -> Self {
        Self {
            users,
            bets,
            markets,
            page_limit: BET_PAGE_LIMIT,
        }
    }

    /// Override the per-user listing page size
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit;
        self
    }

    /// Validate and record a bet against an open market
    ///
    /// Checks run in order: positive stake, market exists, market open,
    /// outcome key resolves, user exists. On success the outcome's odds
    /// are snapshotted into the bet and the payout is fixed at
    /// round2(stake x odds).
    pub async fn place_bet(&self, input: PlaceBet) -> Result<Bet> {
        if input.stake <= Decimal::ZERO {
            return Err(Error::InvalidStake);
        }

        let market = self.markets.get(input.market_id).await?;
        require_open(&market)?;

        let outcome = market
            .outcome(&input.outcome_key)
            .ok_or(Error::InvalidOutcome)?;

        self.users
            .find(input.user_id)
            .await?
            .ok_or(Error::UserNotFound)?;

        let bet = Bet {
            id: BetId::new_v4(),
            user_id: input.user_id,
            market_id: input.market_id,
            outcome_key: input.outcome_key,
            stake: input.stake,
            odds: outcome.odds,
            potential_payout: potential_payout(input.stake, outcome.odds),
            status: BetStatus::Pending,
            placed_at: Utc::now(),
            updated_at: None,
        };

        self.bets.insert(bet.clone()).await?;
        increment(CounterMetric::BetsPlaced);
        tracing::info!(
            bet_id = %bet.id,
            market_id = %bet.market_id,
            outcome_key = %bet.outcome_key,
            stake = %bet.stake,
            "Bet placed"
        );
        Ok(bet)
    }

    /// Resolve one bet against the winning key and persist the transition
    ///
    /// The status is a pure function of (bet, winning_key), so reapplying
    /// the same resolution is safe.
    pub async fn resolve_bet(&self, bet: &Bet, winning_key: &str) -> Result<BetStatus> {
        let status = resolve_status(bet, winning_key);
        self.bets
            .update_resolution(bet.id, status, Utc::now())
            .await?;
        increment(CounterMetric::BetsResolved);
        Ok(status)
    }

    /// All bets riding on one market, unbounded
    pub async fn bets_for_market(&self, market_id: MarketId) -> Result<Vec<Bet>> {
        Ok(self.bets.list_by_market(market_id).await?)
    }

    /// A user's bets, capped at the page limit
    pub async fn bets_for_user(&self, user_id: UserId) -> Result<Vec<Bet>> {
        Ok(self.bets.list_by_user(user_id, self.page_limit).await?)
    }
}
