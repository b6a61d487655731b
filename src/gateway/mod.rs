//! HTTP gateway
//!
//! The bot faces its chat network through this module. A connector process
//! speaks the network's own protocol and bridges it here: inbound messages
//! arrive as POSTs, roster snapshots as PUTs, and everything the bot says
//! streams back out over a per-chat WebSocket feed.

pub mod errors;
pub mod feed;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod platform;
pub mod routes;

pub use feed::ChatFeed;
pub use platform::GatewayChat;

use crate::{
    commands::Dispatcher, config::RuletaConfig, platform::ChatApi, scheduler::SpinRegistry,
    store::CasinoStore,
};
use handlers::AppState;
use middleware::{create_cors_layer, request_id_middleware};
use routes::create_router;
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Gateway server wiring the chat surface to the game core
pub struct GatewayServer {
    config: RuletaConfig,
    store: Arc<CasinoStore>,
}

impl GatewayServer {
    pub fn new(config: RuletaConfig, store: Arc<CasinoStore>) -> Self {
        Self { config, store }
    }

    /// Start the gateway server
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.get_socket_addr()?;
        let (app, registry) = self.create_app();

        info!("🚀 Starting Ruleta Gateway");
        info!("   Listen: http://{}", addr);
        self.log_server_info();

        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("✅ Gateway running");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        // Spin tasks outlive the HTTP surface unless stopped here.
        registry.shutdown();
        info!("🛑 Gateway stopped gracefully");
        Ok(())
    }

    /// Create the application with its middleware stack
    fn create_app(&self) -> (axum::Router, Arc<SpinRegistry>) {
        let feed = Arc::new(ChatFeed::new());
        let platform = Arc::new(GatewayChat::new(Arc::clone(&feed)));

        let registry = Arc::new(SpinRegistry::new(
            Arc::clone(&self.store),
            Arc::clone(&platform) as Arc<dyn ChatApi>,
            self.config.round_interval(),
        ));

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.store),
            Arc::clone(&registry),
            Arc::clone(&platform) as Arc<dyn ChatApi>,
            self.config.game.ranking_size,
            self.config.game.bot_player_id,
        );

        let state = Arc::new(AppState {
            store: Arc::clone(&self.store),
            registry: Arc::clone(&registry),
            dispatcher,
            platform,
            feed,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Instant::now(),
        });

        let app = create_router(state)
            // Request ID middleware (first for tracing)
            .layer(axum::middleware::from_fn(request_id_middleware))

            // CORS layer (before timeout to handle preflight)
            .layer(create_cors_layer(self.config.server.allowed_origins.clone()))

            // Timeout layer
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.server.request_timeout_secs,
            )))

            // Tracing layer (last for complete request tracing)
            .layer(TraceLayer::new_for_http());

        (app, registry)
    }

    /// Get socket address from config
    fn get_socket_addr(&self) -> Result<SocketAddr, Box<dyn std::error::Error>> {
        Ok(SocketAddr::from((
            self.config.server.host.parse::<std::net::IpAddr>()?,
            self.config.server.port,
        )))
    }

    /// Log server information
    fn log_server_info(&self) {
        info!("📋 Server Configuration:");
        info!("   Round interval: {}s", self.config.game.round_interval_secs);
        info!("   Starting balance: {} chips", self.config.game.starting_balance);
        info!("   Ranking size: {}", self.config.game.ranking_size);
        info!("   CORS: {:?}", self.config.server.allowed_origins);
        info!("   Request timeout: {}s", self.config.server.request_timeout_secs);

        info!("📊 Available endpoints:");
        info!("   GET  /health                    - Health check");
        info!("   GET  /status                    - Service status");
        info!("   POST /chats/:chat_id/commands   - Inbound chat messages");
        info!("   PUT  /chats/:chat_id/roster     - Member roster snapshots");
        info!("   GET  /chats/:chat_id/feed       - Outbound message feed (WebSocket)");
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
