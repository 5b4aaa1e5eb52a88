//! 消息 DTO

use serde::{Deserialize, Serialize};

/// 发送消息请求
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SendMessageRequest {
    /// 用户原始输入
    pub message: String,
}

impl SendMessageRequest {
    /// 去除首尾空白后的消息，空消息返回 None
    pub fn trimmed(&self) -> Option<&str> {
        let trimmed = self.message.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
