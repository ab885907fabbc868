//! Persistence seam
//!
//! The engine talks to storage through per-entity traits so the backing
//! store is an injected collaborator, constructed at process start and
//! passed down, never a module-level global.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Bet, BetId, BetStatus, GameType, Market, MarketId, User, UserId};
use crate::error::StoreError;

/// User persistence operations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user
    async fn insert(&self, user: User) -> Result<(), StoreError>;
    /// Find a user by id
    async fn find(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

/// Market persistence operations
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// Persist a new market
    async fn insert(&self, market: Market) -> Result<(), StoreError>;
    /// Find a market by id
    async fn find(&self, id: MarketId) -> Result<Option<Market>, StoreError>;
    /// List markets in insertion order, optionally filtered by game type
    async fn list(
        &self,
        game_type: Option<GameType>,
        limit: usize,
    ) -> Result<Vec<Market>, StoreError>;
    /// Conditional transition open -> settled
    ///
    /// Updates the market only if its current status is open, setting
    /// status, settled_outcome_key and settled_at in one step. Returns the
    /// settled market, or `None` when no open market with this id exists.
    /// The conditional write is what makes concurrent settlement safe: at
    /// most one caller observes a hit.
    async fn settle_if_open(
        &self,
        id: MarketId,
        winning_key: &str,
        settled_at: DateTime<Utc>,
    ) -> Result<Option<Market>, StoreError>;
}

/// Bet persistence operations
#[async_trait]
pub trait BetStore: Send + Sync {
    /// Persist a new bet
    async fn insert(&self, bet: Bet) -> Result<(), StoreError>;
    /// Find a bet by id
    async fn find(&self, id: BetId) -> Result<Option<Bet>, StoreError>;
    /// All bets riding on one market, insertion order, unbounded
    async fn list_by_market(&self, market_id: MarketId) -> Result<Vec<Bet>, StoreError>;
    /// A user's bets in insertion order, capped at `limit`
    async fn list_by_user(&self, user_id: UserId, limit: usize) -> Result<Vec<Bet>, StoreError>;
    /// Set a bet's resolution status and updated_at
    ///
    /// Idempotent: reapplying the same resolution is a no-op apart from
    /// the timestamp.
    async fn update_resolution(
        &self,
        id: BetId,
        status: BetStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
