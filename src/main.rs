//! Ruleta Gateway Binary
//!
//! Runs the casino bot behind its HTTP/WebSocket gateway.

use clap::Parser;
use ruleta::config::RuletaConfig;
use ruleta::gateway::GatewayServer;
use ruleta::store::CasinoStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ruleta")]
#[command(about = "Group-chat roulette casino bot", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Gateway host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Gateway port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Database directory (overrides config)
    #[arg(long)]
    db_path: Option<String>,

    /// Allowed CORS origins (comma-separated, use * for all)
    #[arg(long)]
    cors_origins: Option<String>,

    /// Seconds between draws (overrides config)
    #[arg(long)]
    round_interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruleta=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = RuletaConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(db_path) = args.db_path {
        config.storage.data_dir = db_path;
    }
    if let Some(origins) = args.cors_origins {
        config.server.allowed_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Some(interval) = args.round_interval {
        config.game.round_interval_secs = interval;
    }
    config.validate()?;

    info!("📂 Opening casino database: {}", config.storage.data_dir);
    let store = Arc::new(CasinoStore::open(
        &config.storage.data_dir,
        config.game.starting_balance,
    )?);
    info!("✅ Database opened successfully");

    let server = GatewayServer::new(config, store);
    server.run().await?;

    Ok(())
}
