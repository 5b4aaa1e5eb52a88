//! 会话存储

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::models::message::ChatMessage;

/// 按会话 ID 存取消息的存储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// 确保会话存在，不存在时创建空会话
    async fn ensure(&self, conversation_id: &str) -> Result<()>;

    /// 追加一条消息，会话不存在时自动创建
    async fn append(&self, conversation_id: &str, message: ChatMessage) -> Result<()>;

    /// 获取会话历史，未知会话返回空列表
    async fn history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>>;

    /// 会话数量
    async fn count(&self) -> Result<usize>;
}

/// 进程内存储，进程重启后数据丢失
#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: DashMap<String, Vec<ChatMessage>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn ensure(&self, conversation_id: &str) -> Result<()> {
        self.conversations
            .entry(conversation_id.to_string())
            .or_default();
        Ok(())
    }

    async fn append(&self, conversation_id: &str, message: ChatMessage) -> Result<()> {
        self.conversations
            .entry(conversation_id.to_string())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>> {
        Ok(self
            .conversations
            .get(conversation_id)
            .map(|messages| messages.value().clone())
            .unwrap_or_default())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.conversations.len())
    }
}

pub fn create_conversation_store() -> Arc<dyn ConversationStore> {
    Arc::new(InMemoryConversationStore::new())
}
