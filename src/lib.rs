//! wagerbook: betting-market backend for cricket and matka markets
//!
//! This library provides the core components for:
//! - Market lifecycle (creation validation, open -> settled transition)
//! - Bet ledger (placement with frozen odds, pending -> won/lost)
//! - Settlement engine (atomic market close plus per-bet fan-out)
//! - Pluggable entity stores behind async traits
//! - Thin JSON transport over the engine
//! - Logging and metrics

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod market;
pub mod settlement;
pub mod store;
pub mod telemetry;
pub mod users;
