use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{api::app_state::AppState, error::AppError};

/// 获取会话历史，未知会话返回空数组
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting conversation: {}", id);

    let history = state.store.history(&id).await?;
    Ok(Json(history))
}
