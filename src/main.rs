//! Pairlock arbitrage bot entry point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pairlock::bot::Bot;
use pairlock::config::Config;
use pairlock::market::{Catalog, ClobClient};
use pairlock::metrics;
use pairlock::report::DiscordReporter;

/// Yes/no pair arbitrage bot for Polymarket prediction markets.
#[derive(Parser, Debug)]
#[command(name = "pairlock")]
#[command(about = "Automated yes/no arbitrage bot for Polymarket binary markets")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the main arbitrage scan loop (default).
    Run,

    /// Check configuration validity.
    CheckConfig,

    /// Refresh the catalog once and print the admitted market pairs.
    ListMarkets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("pairlock=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::ListMarkets) => cmd_list_markets().await,
        Some(Command::Run) | None => cmd_run().await,
    }
}

/// Load and validate configuration; both failures are fatal before the
/// loop ever starts.
fn load_config() -> anyhow::Result<Config> {
    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        anyhow::anyhow!("configuration load failed: {e}")
    })?;

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("configuration validation failed: {e}"));
    }

    Ok(config)
}

/// Run the scan loop until interrupted.
async fn cmd_run() -> anyhow::Result<()> {
    let config = load_config()?;

    metrics::init_metrics();
    if config.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
        if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
            warn!(error = %e, "Prometheus exporter failed to start, continuing without it");
        } else {
            info!(%addr, "Prometheus exporter listening");
        }
    }

    info!("========================================");
    info!("PAIRLOCK ARBITRAGE BOT");
    info!("========================================");
    info!("Exchange:        {}", config.polymarket_clob_url);
    info!("Chain ID:        {}", config.chain_id);
    info!("Threshold:       {}", config.arb_threshold);
    info!("Shares per leg:  {}", config.shares_per_trade);
    info!("Fee haircut:     {}", config.fee_rate);
    info!("Scan interval:   {}s", config.scan_interval_secs);
    info!("Refresh cadence: every {} scans", config.refresh_every_scans);
    info!(
        "Allocation:      {}% pure / {}% lag",
        config.arb_pure_percent, config.arb_lag_percent
    );
    info!(
        "Reporting:       {}",
        if config.discord_webhook_url.is_some() {
            "Discord webhook"
        } else {
            "disabled"
        }
    );
    info!("========================================");

    let client = ClobClient::new(&config);
    let reporter = DiscordReporter::new(config.discord_webhook_url.clone());
    let mut bot = Bot::new(config, client, reporter);

    // Interrupts are honored at tick boundaries only; an in-flight
    // execution always resolves before the loop stops.
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping at next tick boundary");
                stop.store(true, Ordering::SeqCst);
            }
        });
    }

    bot.run(stop).await;

    info!("Bot stopped cleanly");
    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PAIRLOCK - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Exchange URL:     {}", config.polymarket_clob_url);
    println!("  Chain ID:         {}", config.chain_id);
    println!("  Arb Threshold:    {}", config.arb_threshold);
    println!("  Shares Per Trade: {}", config.shares_per_trade);
    println!("  Fee Haircut:      {}", config.fee_rate);
    println!("  Scan Interval:    {}s", config.scan_interval_secs);
    println!("  Refresh Cadence:  every {} scans", config.refresh_every_scans);
    println!("  Keywords:         {}", config.market_keywords.join(", "));
    println!(
        "  Allocation:       {}% pure / {}% lag",
        config.arb_pure_percent, config.arb_lag_percent
    );
    println!(
        "  Discord Webhook:  {}",
        if config.discord_webhook_url.is_some() {
            "configured"
        } else {
            "not set"
        }
    );
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Refresh the catalog once and print the admitted pairs.
async fn cmd_list_markets() -> anyhow::Result<()> {
    let config = load_config()?;
    let client = ClobClient::new(&config);

    let mut catalog = Catalog::new();
    let count = catalog
        .refresh(&client, &config.market_keywords)
        .await
        .map_err(|e| anyhow::anyhow!("catalog refresh failed: {e}"))?;

    println!("Admitted {} market pair(s):", count);
    let mut pairs = catalog.snapshot();
    pairs.sort_by(|a, b| a.question.cmp(&b.question));
    for pair in pairs {
        println!("  {}", pair.question);
        println!("    yes: {}", pair.yes_token_id);
        println!("    no:  {}", pair.no_token_id);
    }

    Ok(())
}
