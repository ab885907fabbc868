use clap::Parser;
use wagerbook::cli::{Cli, Commands};
use wagerbook::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    let _guard = wagerbook::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("Starting betting backend");
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  CORS: {}", config.server.enable_cors);
            println!(
                "  Limits: markets={}, bets={}",
                config.limits.market_page_size, config.limits.bet_page_size
            );
            println!("  Log level: {}", config.telemetry.log_level);
        }
    }

    Ok(())
}
