//! CLI interface for wagerbook
//!
//! Provides subcommands for:
//! - `serve`: Run the betting backend HTTP server
//! - `config`: Show the effective configuration

mod serve;

pub use serve::ServeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wagerbook")]
#[command(about = "Betting-market backend for cricket and matka markets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Show the effective configuration
    Config,
}
