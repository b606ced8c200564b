use clap::Parser;
use tick_relay::cli::{Cli, Commands};
use tick_relay::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    tick_relay::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting tick relay pipeline");
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Finnhub: enabled={} symbols={:?}",
                config.finnhub.enabled, config.finnhub.symbols
            );
            println!(
                "  Binance: enabled={} symbols={:?}",
                config.binance.enabled, config.binance.symbols
            );
            println!("  Broadcast: every {}ms", config.broadcast.interval_ms);
            println!("  Persistence: enabled={}", config.persistence.enabled);
            println!(
                "  Verify: enabled={} every {}s",
                config.verify.enabled, config.verify.interval_secs
            );
        }
    }

    Ok(())
}
