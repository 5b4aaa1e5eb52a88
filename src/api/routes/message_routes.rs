//! Message Routes

use crate::api::handlers::message_handler::*;
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建消息路由器
pub fn create_message_router() -> Router<AppState> {
    Router::new().route("/message", post(send_message))
}
