//! 存储层模块
//!
//! 对话消息的键值存储。核心流水线不依赖存储，只有传输层通过注入的
//! `ConversationStore` 读写会话历史。

pub mod conversation;

pub use conversation::{ConversationStore, InMemoryConversationStore, create_conversation_store};
#[cfg(test)]
pub use conversation::MockConversationStore;
