//! API 模块
//!
//! 提供 REST API 和 WebSocket 入口。

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use crate::api::app_state::AppState;
use crate::error::AppError;
use crate::observability::{ObservabilityState, create_observability_router, metrics_middleware};
use crate::websocket::create_websocket_router;
use axum::Router;
use axum::http::{HeaderValue, Method};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub fn create_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::message_routes::create_message_router())
        .merge(routes::conversation_routes::create_conversation_router());

    let observability = Arc::new(ObservabilityState::new(
        app_state.metrics.clone(),
        env!("CARGO_PKG_VERSION").to_string(),
    ));
    let cors = cors_layer(&app_state.config.server.cors_origins);
    let metrics = app_state.metrics.clone();

    Router::new()
        .nest("/api", api)
        .merge(create_websocket_router())
        .with_state(app_state)
        .merge(create_observability_router(observability))
        .layer(axum::middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn initialize_api(app_state: AppState) -> Result<Router, AppError> {
    tracing::info!("Initializing API router...");
    Ok(create_router(app_state))
}

/// 按配置的来源列表构建 CORS 层，`*` 表示允许任意来源
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
