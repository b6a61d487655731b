//! Route definitions
//!
//! Maps URLs to handlers with type-safe routing.

use super::{feed::feed_handler, handlers::*};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Build the gateway router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check (high priority)
        .route("/health", get(health_handler))

        // Status endpoint
        .route("/status", get(status_handler))

        // Inbound chat traffic
        .route("/chats/:chat_id/commands", post(command_handler))

        // Roster snapshots for admin checks
        .route("/chats/:chat_id/roster", put(roster_handler))

        // WebSocket feed of outbound messages
        .route("/chats/:chat_id/feed", get(feed_handler))

        // Attach shared state
        .with_state(state)
}
