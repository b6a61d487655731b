//! Chat platform backed by the gateway itself
//!
//! The gateway is the bot's window onto the chat service: connectors push
//! roster snapshots in over HTTP and pull bot messages out over the feed.
//! `GatewayChat` wires those two surfaces into the [`ChatApi`] the game logic
//! talks to, so the core never learns which chat network it is serving.

use super::feed::ChatFeed;
use crate::game::types::{ChatId, PlayerId};
use crate::platform::{ChatApi, ChatMember, PlatformError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

pub struct GatewayChat {
    rosters: DashMap<ChatId, Vec<ChatMember>>,
    feed: Arc<ChatFeed>,
}

impl GatewayChat {
    pub fn new(feed: Arc<ChatFeed>) -> Self {
        Self {
            rosters: DashMap::new(),
            feed,
        }
    }

    /// Replace a chat's member roster with a fresh snapshot
    pub fn update_roster(&self, chat: ChatId, members: Vec<ChatMember>) {
        debug!("Roster update for chat {}: {} members", chat, members.len());
        self.rosters.insert(chat, members);
    }

    pub fn known_chats(&self) -> usize {
        self.rosters.len()
    }
}

#[async_trait]
impl ChatApi for GatewayChat {
    async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), PlatformError> {
        // Feed delivery is fire-and-forget; a chat with no subscribers
        // still counts as sent.
        self.feed.publish_message(chat, text);
        Ok(())
    }

    async fn chat_admins(&self, chat: ChatId) -> Result<Vec<ChatMember>, PlatformError> {
        let roster = self
            .rosters
            .get(&chat)
            .ok_or(PlatformError::UnknownChat(chat))?;
        Ok(roster
            .iter()
            .filter(|m| m.role.is_admin())
            .cloned()
            .collect())
    }

    async fn member(&self, chat: ChatId, player: PlayerId) -> Result<ChatMember, PlatformError> {
        let roster = self
            .rosters
            .get(&chat)
            .ok_or(PlatformError::UnknownChat(chat))?;
        roster
            .iter()
            .find(|m| m.id == player)
            .cloned()
            .ok_or(PlatformError::UnknownMember { chat, player })
    }
}
