//! Routes 模块
//!
//! 定义 API 路由。

pub mod conversation_routes;
pub mod message_routes;
