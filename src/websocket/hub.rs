//! Conversation Broadcast Hub
//!
//! One broadcast channel per conversation id, created lazily on first subscribe.
//! Every listener joined to a conversation receives the same event stream.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::message::ChatMessage;

/// Events pushed from the server to WebSocket clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A new message in the conversation
    Message(ChatMessage),
    /// Full history, sent to a socket right after it joins
    ConversationHistory(Vec<ChatMessage>),
    /// The bot is working on a reply
    Typing,
    /// The client sent something we could not handle
    Error(String),
}

/// Per-conversation broadcast channels
pub struct ConversationHub {
    channels: DashMap<String, broadcast::Sender<ServerEvent>>,
    capacity: usize,
}

impl ConversationHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to a conversation, creating its channel if needed
    pub fn subscribe(&self, conversation_id: &str) -> broadcast::Receiver<ServerEvent> {
        self.channels
            .entry(conversation_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Publish an event to every listener of a conversation.
    ///
    /// Returns the number of listeners reached; no listeners is not an error.
    pub fn publish(&self, conversation_id: &str, event: ServerEvent) -> usize {
        let sent = self
            .channels
            .get(conversation_id)
            .and_then(|sender| sender.send(event).ok());

        let delivered = match sent {
            Some(count) => count,
            None => {
                self.release(conversation_id);
                0
            }
        };

        debug!(conversation_id, delivered, "Published conversation event");
        delivered
    }

    /// Drop a conversation's channel once nobody listens to it.
    ///
    /// Returns true when the channel was removed.
    pub fn release(&self, conversation_id: &str) -> bool {
        self.channels
            .remove_if(conversation_id, |_, sender| sender.receiver_count() == 0)
            .is_some()
    }

    /// Number of live listeners for a conversation
    pub fn listener_count(&self, conversation_id: &str) -> usize {
        self.channels
            .get(conversation_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}
