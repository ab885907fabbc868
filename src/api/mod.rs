//! Transport layer
//!
//! Thin JSON boundary over the engine: handlers parse opaque string ids,
//! call core operations and map error kinds to status codes. No betting
//! rule lives here.

mod handlers;
mod server;

pub use server::ApiServer;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::config::LimitsConfig;
use crate::error::Error;
use crate::ledger::BetLedger;
use crate::market::MarketService;
use crate::settlement::SettlementEngine;
use crate::store::{BetStore, MarketStore, UserStore};
use crate::users::UserService;
use std::sync::Arc;

/// Services shared across handlers
pub struct AppState {
    pub users: UserService,
    pub markets: MarketService,
    pub ledger: BetLedger,
    pub engine: SettlementEngine,
}

impl AppState {
    /// Wire the services over one set of stores
    pub fn new(
        users: Arc<dyn UserStore>,
        markets: Arc<dyn MarketStore>,
        bets: Arc<dyn BetStore>,
        limits: &LimitsConfig,
    ) -> Self {
        let market_service =
            || MarketService::new(markets.clone()).with_page_limit(limits.market_page_size);
        let ledger_service = || {
            BetLedger::new(users.clone(), bets.clone(), market_service())
                .with_page_limit(limits.bet_page_size)
        };

        Self {
            users: UserService::new(users.clone()),
            markets: market_service(),
            ledger: ledger_service(),
            engine: SettlementEngine::new(market_service(), ledger_service()),
        }
    }
}

/// `{id}` response for create operations
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: String,
}

/// `{items: [..]}` response for listings
#[derive(Debug, Serialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

/// Error body surfaced to callers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Core error carried to the HTTP edge
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            e if e.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ErrorResponse {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Parse an opaque boundary id
pub fn parse_id(raw: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::InvalidIdFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_id("not-an-id"),
            Err(Error::InvalidIdFormat)
        ));
        assert!(matches!(parse_id(""), Err(Error::InvalidIdFormat)));
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (Error::InvalidIdFormat, StatusCode::BAD_REQUEST),
            (Error::InvalidStake, StatusCode::BAD_REQUEST),
            (Error::MarketNotOpen, StatusCode::BAD_REQUEST),
            (Error::InvalidOutcome, StatusCode::BAD_REQUEST),
            (Error::MarketNotFound, StatusCode::NOT_FOUND),
            (Error::UserNotFound, StatusCode::NOT_FOUND),
            (
                Error::Store(StoreError::Unavailable("down".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
