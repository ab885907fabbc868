//! HTTP route handlers
//!
//! Request handlers for the betting endpoints: create/list markets,
//! place bets, list a user's bets, settle a market, plus user creation
//! and a health probe.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{parse_id, ApiError, AppState, IdResponse, ItemsResponse};
use crate::domain::{Bet, Market};
use crate::ledger::PlaceBet;
use crate::market::NewMarket;
use crate::settlement::SettlementReport;

/// Create user request body
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// List markets query string
#[derive(Debug, Deserialize)]
pub struct ListMarketsQuery {
    pub game_type: Option<String>,
}

/// Place bet request body, ids as opaque strings
#[derive(Debug, Deserialize)]
pub struct PlaceBetRequest {
    pub user_id: String,
    pub market_id: String,
    pub outcome_key: String,
    pub stake: Decimal,
}

/// Settle market request body
#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    pub settled_outcome_key: String,
}

/// Settle market response
#[derive(Debug, Serialize)]
pub struct SettleResponse {
    pub status: &'static str,
    pub report: SettlementReport,
}

/// Health probe response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub store: &'static str,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let user = state.users.create_user(&req.username, req.email).await?;
    Ok(Json(IdResponse {
        id: user.id.to_string(),
    }))
}

/// POST /api/markets
pub async fn create_market(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewMarket>,
) -> Result<Json<IdResponse>, ApiError> {
    let market = state.markets.create_market(req).await?;
    Ok(Json(IdResponse {
        id: market.id.to_string(),
    }))
}

/// GET /api/markets?game_type=
pub async fn list_markets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListMarketsQuery>,
) -> Result<Json<ItemsResponse<Market>>, ApiError> {
    let items = state.markets.list(query.game_type.as_deref()).await?;
    Ok(Json(ItemsResponse { items }))
}

/// POST /api/bets
pub async fn place_bet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceBetRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let input = PlaceBet {
        user_id: parse_id(&req.user_id)?,
        market_id: parse_id(&req.market_id)?,
        outcome_key: req.outcome_key,
        stake: req.stake,
    };
    let bet = state.ledger.place_bet(input).await?;
    Ok(Json(IdResponse {
        id: bet.id.to_string(),
    }))
}

/// GET /api/users/{user_id}/bets
pub async fn list_user_bets(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<ItemsResponse<Bet>>, ApiError> {
    let user_id = parse_id(&user_id)?;
    let items = state.ledger.bets_for_user(user_id).await?;
    Ok(Json(ItemsResponse { items }))
}

/// POST /api/markets/{market_id}/settle
pub async fn settle_market(
    State(state): State<Arc<AppState>>,
    Path(market_id): Path<String>,
    Json(req): Json<SettleRequest>,
) -> Result<Json<SettleResponse>, ApiError> {
    let market_id = parse_id(&market_id)?;
    let report = state
        .engine
        .settle_market(market_id, &req.settled_outcome_key)
        .await?;
    Ok(Json(SettleResponse {
        status: "ok",
        report,
    }))
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = match state.markets.list(None).await {
        Ok(_) => "connected",
        Err(_) => "unavailable",
    };
    Json(HealthResponse {
        status: "ok",
        service: "wagerbook",
        store,
    })
}
