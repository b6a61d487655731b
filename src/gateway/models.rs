//! Request and response payloads for the gateway surface

use crate::game::types::{ChatId, PlayerId};
use crate::platform::ChatRole;
use serde::{Deserialize, Serialize};

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Chats with an armed spin timer
    pub active_chats: usize,
    /// Players known to the store
    pub players: usize,
    /// Live feed subscribers
    pub feed_clients: u64,
}

/// Someone referenced in a command request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantPayload {
    pub player_id: PlayerId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub is_bot: bool,
}

/// POST /chats/{chat_id}/commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub sender: ParticipantPayload,
    pub text: String,
    /// Set when the message replied to another member's message
    #[serde(default)]
    pub reply_to: Option<ParticipantPayload>,
}

/// Reply to a command request; `null` when the text was not a command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub reply: Option<String>,
}

/// One roster entry as the connector reports it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMember {
    pub player_id: PlayerId,
    #[serde(default)]
    pub display_name: String,
    pub role: ChatRole,
}

/// PUT /chats/{chat_id}/roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterUpdate {
    pub members: Vec<RosterMember>,
}

/// Acknowledgement for a roster replacement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResponse {
    pub chat_id: ChatId,
    pub members: usize,
}
