//! In-memory store
//!
//! Backing store for tests and single-process deployments. Entities live
//! in insertion-order vectors behind async RwLocks; the market settle is
//! done under a single write lock so the open check and the status write
//! are one atomic step.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{BetStore, MarketStore, UserStore};
use crate::domain::{Bet, BetId, BetStatus, GameType, Market, MarketId, MarketStatus, User, UserId};
use crate::error::StoreError;

/// In-memory implementation of all three entity stores
#[derive(Default)]
pub struct MemoryStore {
    users: Arc<RwLock<Vec<User>>>,
    markets: Arc<RwLock<Vec<Market>>>,
    bets: Arc<RwLock<Vec<Bet>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        users.push(user);
        Ok(())
    }

    async fn find(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl MarketStore for MemoryStore {
    async fn insert(&self, market: Market) -> Result<(), StoreError> {
        let mut markets = self.markets.write().await;
        markets.push(market);
        Ok(())
    }

    async fn find(&self, id: MarketId) -> Result<Option<Market>, StoreError> {
        let markets = self.markets.read().await;
        Ok(markets.iter().find(|m| m.id == id).cloned())
    }

    async fn list(
        &self,
        game_type: Option<GameType>,
        limit: usize,
    ) -> Result<Vec<Market>, StoreError> {
        let markets = self.markets.read().await;
        Ok(markets
            .iter()
            .filter(|m| game_type.map_or(true, |gt| m.game_type == gt))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn settle_if_open(
        &self,
        id: MarketId,
        winning_key: &str,
        settled_at: DateTime<Utc>,
    ) -> Result<Option<Market>, StoreError> {
        let mut markets = self.markets.write().await;
        let Some(market) = markets
            .iter_mut()
            .find(|m| m.id == id && m.status == MarketStatus::Open)
        else {
            return Ok(None);
        };

        market.status = MarketStatus::Settled;
        market.settled_outcome_key = Some(winning_key.to_string());
        market.settled_at = Some(settled_at);

        tracing::info!(market_id = %id, winning_key, "Market settled");
        Ok(Some(market.clone()))
    }
}

#[async_trait]
impl BetStore for MemoryStore {
    async fn insert(&self, bet: Bet) -> Result<(), StoreError> {
        let mut bets = self.bets.write().await;
        bets.push(bet);
        Ok(())
    }

    async fn find(&self, id: BetId) -> Result<Option<Bet>, StoreError> {
        let bets = self.bets.read().await;
        Ok(bets.iter().find(|b| b.id == id).cloned())
    }

    async fn list_by_market(&self, market_id: MarketId) -> Result<Vec<Bet>, StoreError> {
        let bets = self.bets.read().await;
        Ok(bets
            .iter()
            .filter(|b| b.market_id == market_id)
            .cloned()
            .collect())
    }

    async fn list_by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<Bet>, StoreError> {
        let bets = self.bets.read().await;
        Ok(bets
            .iter()
            .filter(|b| b.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn update_resolution(
        &self,
        id: BetId,
        status: BetStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut bets = self.bets.write().await;
        let Some(bet) = bets.iter_mut().find(|b| b.id == id) else {
            return Err(StoreError::Unavailable(format!("no bet with id {id}")));
        };
        bet.status = status;
        bet.updated_at = Some(updated_at);
        Ok(())
    }
}
