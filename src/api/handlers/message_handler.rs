use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::SendMessageRequest},
    error::AppError,
};

/// 单次问答，不写入任何会话
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let message = request
        .trimmed()
        .ok_or_else(|| AppError::Validation("Message is required".to_string()))?;
    debug!("Processing message: {}", message);

    let response = state.router.process_query(message).await;
    Ok(Json(response))
}
