//! Chat platform seam
//!
//! The bot core talks to whatever carries the group chat through this trait.
//! The bundled HTTP gateway implements it; a future connector for a real chat
//! network would be another implementation, with no changes to the core.

use crate::game::types::{ChatId, PlayerId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership role as the platform reports it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    Creator,
    Admin,
    Member,
}

impl ChatRole {
    /// Creator and admin both pass admin gates
    pub fn is_admin(&self) -> bool {
        matches!(self, ChatRole::Creator | ChatRole::Admin)
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::Creator => write!(f, "creator"),
            ChatRole::Admin => write!(f, "admin"),
            ChatRole::Member => write!(f, "member"),
        }
    }
}

/// One member of a chat as the platform sees them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMember {
    pub id: PlayerId,
    pub display_name: String,
    pub role: ChatRole,
}

/// Platform collaborator failures
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    #[error("chat {0} is unknown to the platform")]
    UnknownChat(ChatId),

    #[error("player {player} is not a member of chat {chat}")]
    UnknownMember { chat: ChatId, player: PlayerId },

    #[error("platform unavailable: {0}")]
    Unavailable(String),
}

/// Outbound surface of the chat platform
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Post a message into the chat
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), PlatformError>;

    /// Current administrators of the chat (creator included)
    async fn chat_admins(&self, chat: ChatId) -> Result<Vec<ChatMember>, PlatformError>;

    /// Look up a single member
    async fn member(&self, chat: ChatId, player: PlayerId) -> Result<ChatMember, PlatformError>;
}
