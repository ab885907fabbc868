//! Core record types for the betting engine
//!
//! Markets carry a fixed list of outcomes with decimal odds; bets freeze
//! the odds of one outcome at placement time. All money fields are
//! `Decimal`, never floats.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// User identifier
pub type UserId = Uuid;
/// Market identifier
pub type MarketId = Uuid;
/// Bet identifier
pub type BetId = Uuid;

/// Supported market categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Cricket,
    Matka,
    Other,
}

impl GameType {
    /// Parse a game type from its wire name
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "cricket" => Ok(GameType::Cricket),
            "matka" => Ok(GameType::Matka),
            "other" => Ok(GameType::Other),
            _ => Err(Error::InvalidGameType(s.to_string())),
        }
    }

    /// Wire name of this game type
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Cricket => "cricket",
            GameType::Matka => "matka",
            GameType::Other => "other",
        }
    }
}

/// Market lifecycle state
///
/// Only open markets accept bets; the core defines a single transition,
/// open to settled. `Closed` is a reachable schema value with no
/// transition into it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Open,
    Closed,
    Settled,
}

/// Bet lifecycle state
///
/// Settlement moves pending bets to won or lost. `Refunded` is a
/// reachable schema value with no transition into it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
    Refunded,
}

/// One selectable result of a market, validated at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Key unique within the market
    pub key: String,
    /// Human label, e.g. "Team A to Win"
    pub label: String,
    /// Decimal odds, strictly greater than 1.0
    pub odds: Decimal,
}

impl Outcome {
    /// Build a validated outcome
    pub fn new(key: impl Into<String>, label: impl Into<String>, odds: Decimal) -> Result<Self, Error> {
        let key = key.into();
        let label = label.into();
        if key.trim().is_empty() || label.trim().is_empty() {
            return Err(Error::IncompleteOutcome);
        }
        if odds <= Decimal::ONE {
            return Err(Error::InvalidOdds(odds));
        }
        Ok(Self { key, label, odds })
    }
}

/// A bettable event with a fixed list of mutually exclusive outcomes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Unique market identifier
    pub id: MarketId,
    /// Market category
    pub game_type: GameType,
    /// Display title
    pub title: String,
    /// Ordered outcome list, immutable after creation
    pub outcomes: Vec<Outcome>,
    /// Lifecycle state, monotonic once settled
    pub status: MarketStatus,
    /// Scheduled start, if any
    pub start_time: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Winning outcome key, set only at settlement
    pub settled_outcome_key: Option<String>,
    /// Settlement timestamp, set only at settlement
    pub settled_at: Option<DateTime<Utc>>,
}

impl Market {
    /// Look up an outcome by key
    pub fn outcome(&self, key: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.key == key)
    }

    /// Whether the market still accepts bets
    pub fn is_open(&self) -> bool {
        self.status == MarketStatus::Open
    }
}

/// A user's stake on one outcome of one market
///
/// Odds and potential payout are frozen at placement and never change,
/// even if the market were mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    /// Unique bet identifier
    pub id: BetId,
    /// Owning user (non-owning reference)
    pub user_id: UserId,
    /// Market this bet rides on (non-owning reference)
    pub market_id: MarketId,
    /// Chosen outcome key
    pub outcome_key: String,
    /// Stake amount, strictly positive
    pub stake: Decimal,
    /// Odds snapshot taken at placement
    pub odds: Decimal,
    /// stake x odds, rounded to 2 decimal places
    pub potential_payout: Decimal,
    /// Lifecycle state
    pub status: BetStatus,
    /// Placement timestamp
    pub placed_at: DateTime<Utc>,
    /// Set only on the settlement transition
    pub updated_at: Option<DateTime<Utc>>,
}

/// A registered bettor; balance is informational only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,
    /// Unique username
    pub username: String,
    /// Optional email address
    pub email: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Account activity flag
    pub is_active: bool,
    /// Wallet balance, not enforced by this core
    pub balance: Decimal,
}

/// Compute stake x odds rounded to 2 decimal places, half-up
///
/// The result always carries scale 2 so money values serialize with a
/// fixed two-digit fraction ("180.00", never "180.0").
pub fn potential_payout(stake: Decimal, odds: Decimal) -> Decimal {
    let mut payout =
        (stake * odds).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    payout.rescale(2);
    payout
}
