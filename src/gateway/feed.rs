//! WebSocket feed of outbound chat messages
//!
//! Everything the bot says lands on a per-chat broadcast channel. Connector
//! processes (or a curious developer with `websocat`) subscribe to one chat's
//! feed and relay the messages onward. Messages sent while nobody listens are
//! dropped, matching fire-and-forget chat delivery.

use super::handlers::AppState;
use crate::game::types::ChatId;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Feed event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedEvent {
    /// The bot posted a message into the chat
    #[serde(rename = "message")]
    Message {
        chat_id: ChatId,
        text: String,
        timestamp: u64,
    },

    /// Subscription handshake
    #[serde(rename = "connected")]
    Connected { chat_id: ChatId, timestamp: u64 },
}

/// Per-chat broadcast hub
pub struct ChatFeed {
    channels: DashMap<ChatId, broadcast::Sender<FeedEvent>>,
    client_count: AtomicU64,
}

impl ChatFeed {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
            client_count: AtomicU64::new(0),
        }
    }

    fn sender(&self, chat: ChatId) -> broadcast::Sender<FeedEvent> {
        self.channels
            .entry(chat)
            .or_insert_with(|| broadcast::channel(1024).0)
            .clone()
    }

    /// Publish one outbound message to the chat's subscribers
    pub fn publish_message(&self, chat: ChatId, text: &str) {
        let event = FeedEvent::Message {
            chat_id: chat,
            text: text.to_string(),
            timestamp: current_timestamp(),
        };

        if let Err(e) = self.sender(chat).send(event) {
            debug!("No feed subscribers for chat {}: {}", chat, e);
        }
    }

    pub fn subscribe(&self, chat: ChatId) -> broadcast::Receiver<FeedEvent> {
        self.sender(chat).subscribe()
    }

    /// Get current client count across all chats
    pub fn client_count(&self) -> u64 {
        self.client_count.load(Ordering::SeqCst)
    }

    /// Handle one subscriber connection until either side hangs up
    pub async fn handle_connection(&self, socket: WebSocket, chat: ChatId) {
        let client_count = self.client_count.fetch_add(1, Ordering::SeqCst) + 1;
        info!("🔌 Feed client connected to chat {} (total: {})", chat, client_count);

        let (mut sink, mut stream) = socket.split();
        let mut rx = self.subscribe(chat);

        // Handshake event so subscribers can tell a live socket from a stalled one.
        let welcome = FeedEvent::Connected {
            chat_id: chat,
            timestamp: current_timestamp(),
        };
        match serde_json::to_string(&welcome) {
            Ok(payload) => {
                if let Err(e) = sink.send(Message::Text(payload)).await {
                    warn!("Failed to send feed handshake for chat {}: {}", chat, e);
                    self.client_count.fetch_sub(1, Ordering::SeqCst);
                    return;
                }
            }
            Err(e) => {
                error!("Failed to serialize feed handshake: {}", e);
                self.client_count.fetch_sub(1, Ordering::SeqCst);
                return;
            }
        }

        // Task to drain incoming frames; the feed is outbound-only.
        let receive_task = tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(Message::Close(_)) => {
                        debug!("Feed client of chat {} requested close", chat);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Feed socket error on chat {}: {}", chat, e);
                        break;
                    }
                }
            }
        });

        // Task to relay broadcast events to this client.
        let send_task = tokio::spawn(async move {
            while let Ok(event) = rx.recv().await {
                let message = match serde_json::to_string(&event) {
                    Ok(payload) => Message::Text(payload),
                    Err(e) => {
                        error!("Failed to serialize feed event: {}", e);
                        continue;
                    }
                };

                if sink.send(message).await.is_err() {
                    break;
                }
            }
        });

        // Wait for either task to complete
        tokio::select! {
            _ = receive_task => {
                debug!("Receive task completed for chat {} feed", chat);
            }
            _ = send_task => {
                debug!("Send task completed for chat {} feed", chat);
            }
        }

        let remaining = self.client_count.fetch_sub(1, Ordering::SeqCst) - 1;
        info!("🔌 Feed client left chat {} (remaining: {})", chat, remaining);
    }
}

impl Default for ChatFeed {
    fn default() -> Self {
        Self::new()
    }
}

/// Get current timestamp in seconds
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// WebSocket endpoint handler
/// GET /chats/{chat_id}/feed
pub async fn feed_handler(
    ws: WebSocketUpgrade,
    Path(chat_id): Path<ChatId>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let feed = Arc::clone(&state.feed);
    ws.on_upgrade(move |socket| async move { feed.handle_connection(socket, chat_id).await })
}
