//! Request handlers
//!
//! Connectors post inbound chat traffic here and the bot's reply travels
//! back both in the response and over the chat's feed.

use super::{
    errors::ApiError,
    feed::ChatFeed,
    middleware::RequestId,
    models::*,
    platform::GatewayChat,
};
use crate::{
    commands::{Dispatcher, InboundMessage, Participant},
    game::types::ChatId,
    platform::{ChatApi, ChatMember},
    scheduler::SpinRegistry,
    store::CasinoStore,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Shared application state
pub struct AppState {
    pub store: Arc<CasinoStore>,
    pub registry: Arc<SpinRegistry>,
    pub dispatcher: Dispatcher,
    pub platform: Arc<GatewayChat>,
    pub feed: Arc<ChatFeed>,
    pub version: String,
    pub started_at: Instant,
}

/// Health check handler - minimal response time
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
    })
}

/// Status handler
/// GET /status
pub async fn status_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let players = state.store.player_count().map_err(|e| {
        ApiError::internal_error(
            request_id.0.clone(),
            format!("Failed to count players: {}", e),
        )
    })?;

    Ok(Json(StatusResponse {
        service: "ruleta".to_string(),
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        active_chats: state.registry.active_count(),
        players,
        feed_clients: state.feed.client_count(),
    }))
}

fn participant(payload: ParticipantPayload) -> Participant {
    Participant {
        id: payload.player_id,
        display_name: payload.display_name,
        is_bot: payload.is_bot,
    }
}

/// Command handler: run one inbound chat message through the bot
/// POST /chats/{chat_id}/commands
pub async fn command_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<ChatId>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    // Blank text is a connector bug, not a player mistake.
    if request.text.trim().is_empty() {
        return Err(ApiError::bad_request(
            request_id.0,
            "Message text must not be empty".to_string(),
        ));
    }

    let message = InboundMessage {
        chat: chat_id,
        sender: participant(request.sender),
        text: request.text,
        reply_to: request.reply_to.map(participant),
    };

    let reply = state.dispatcher.dispatch(&message).await.map_err(|e| {
        ApiError::internal_error(request_id.0.clone(), format!("Command failed: {}", e))
    })?;

    if let Some(text) = &reply {
        // Feed delivery cannot fail, but the trait allows it for other backends.
        if let Err(e) = state.platform.send_message(chat_id, text).await {
            warn!(chat = chat_id, error = %e, "failed to publish reply");
        }
    }

    Ok(Json(CommandResponse { reply }))
}

/// Roster handler: replace a chat's member snapshot
/// PUT /chats/{chat_id}/roster
pub async fn roster_handler(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<ChatId>,
    Json(update): Json<RosterUpdate>,
) -> Json<RosterResponse> {
    let members: Vec<ChatMember> = update
        .members
        .into_iter()
        .map(|m| ChatMember {
            id: m.player_id,
            display_name: m.display_name,
            role: m.role,
        })
        .collect();
    let count = members.len();
    state.platform.update_roster(chat_id, members);

    Json(RosterResponse {
        chat_id,
        members: count,
    })
}
