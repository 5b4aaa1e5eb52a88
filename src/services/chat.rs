//! 对话服务
//!
//! 传输层的会话流程：保存并广播用户消息 → 广播 typing → 处理查询 → 保存并广播机器人回复。

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::message::{AgentResponse, ChatMessage};
use crate::services::router::QueryRouter;
use crate::storage::ConversationStore;
use crate::websocket::hub::{ConversationHub, ServerEvent};

/// 存储失败时的机器人回复
pub const DELIVERY_FAILURE: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

pub struct ChatService {
    store: Arc<dyn ConversationStore>,
    router: Arc<QueryRouter>,
    hub: Arc<ConversationHub>,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        router: Arc<QueryRouter>,
        hub: Arc<ConversationHub>,
    ) -> Self {
        Self { store, router, hub }
    }

    /// 加入会话，返回已有历史
    pub async fn join(&self, conversation_id: &str) -> Result<Vec<ChatMessage>> {
        self.store.ensure(conversation_id).await?;
        self.store.history(conversation_id).await
    }

    /// 处理一条用户消息，返回机器人回复
    pub async fn send_message(
        &self,
        conversation_id: &str,
        text: &str,
        timestamp: Option<&str>,
    ) -> ChatMessage {
        let user_message = ChatMessage::user(text, parse_timestamp(timestamp));
        info!(conversation_id, message_id = %user_message.id, "Received user message");

        if let Err(e) = self.store.append(conversation_id, user_message.clone()).await {
            warn!(conversation_id, error = %e, "Failed to store user message");
            return self
                .deliver(conversation_id, ChatMessage::bot(&AgentResponse::system(DELIVERY_FAILURE)))
                .await;
        }
        self.hub
            .publish(conversation_id, ServerEvent::Message(user_message));
        self.hub.publish(conversation_id, ServerEvent::Typing);

        let response = self.router.process_query(text).await;
        self.deliver(conversation_id, ChatMessage::bot(&response)).await
    }

    async fn deliver(&self, conversation_id: &str, message: ChatMessage) -> ChatMessage {
        if let Err(e) = self.store.append(conversation_id, message.clone()).await {
            warn!(conversation_id, error = %e, "Failed to store bot message");
        }
        self.hub
            .publish(conversation_id, ServerEvent::Message(message.clone()));
        message
    }
}

/// 客户端提供的 RFC 3339 时间戳，无法解析时使用当前时间
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
