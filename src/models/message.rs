use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 消息类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// 用户消息
    User,
    /// 机器人回复
    Bot,
}

/// 产生回复的代理
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// 研究代理（包括模板回复）
    Research,
    /// 系统兜底回复
    System,
}

/// 回复可信度
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

/// 查询处理结果
///
/// `process_query` 的唯一输出，任何失败路径都会落到一个格式良好的响应上。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentResponse {
    pub content: String,
    pub agent: AgentKind,
    pub confidence: Confidence,
}

impl AgentResponse {
    pub fn research(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            agent: AgentKind::Research,
            confidence: Confidence::High,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            agent: AgentKind::System,
            confidence: Confidence::Low,
        }
    }
}

/// 对话消息
///
/// 由传输层存储并广播给同一会话的所有监听者。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// 消息唯一标识
    pub id: String,

    /// 消息类型
    #[serde(rename = "type")]
    pub kind: MessageKind,

    /// 消息内容
    pub content: String,

    /// 回复代理（仅机器人消息）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub agent: Option<AgentKind>,

    /// 消息时间
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// 创建用户消息
    pub fn user(content: impl Into<String>, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: MessageKind::User,
            content: content.into(),
            agent: None,
            timestamp: timestamp.unwrap_or_else(Utc::now),
        }
    }

    /// 从代理响应创建机器人消息
    pub fn bot(response: &AgentResponse) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: MessageKind::Bot,
            content: response.content.clone(),
            agent: Some(response.agent),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_response_serialization() {
        let response = AgentResponse::system("sorry");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["agent"], "system");
        assert_eq!(json["confidence"], "low");
        assert_eq!(json["content"], "sorry");
    }

    #[test]
    fn test_chat_message_wire_format() {
        let user = ChatMessage::user("hello", None);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["type"], "user");
        assert!(json.get("agent").is_none());

        let bot = ChatMessage::bot(&AgentResponse::research("answer"));
        let json = serde_json::to_value(&bot).unwrap();
        assert_eq!(json["type"], "bot");
        assert_eq!(json["agent"], "research");
        assert_ne!(user.id, bot.id);
    }
}
