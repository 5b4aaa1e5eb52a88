//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。外部数据源的失败不在这里表达，
//! 它们以 `Lookup::Unavailable` 的形式在研究流水线内部被消化。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 参数验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    /// 外部数据源错误
    #[error("外部数据源错误: {0}")]
    Upstream(String),

    /// 超时错误
    #[error("操作超时: {0}")]
    Timeout(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout(e.to_string())
        } else {
            AppError::Upstream(e.to_string())
        }
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = (&self).into();
        let body = Json(ErrorResponse::new(&code, &self.to_string()));
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response()
    }
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,
    /// 错误消息
    pub message: String,
    /// 详细信息
    pub details: Option<String>,
    /// 请求 ID
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    /// 添加详细信息
    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

/// HTTP 状态码映射
impl From<&AppError> for (u16, String) {
    fn from(err: &AppError) -> (u16, String) {
        match err {
            AppError::Validation(_) => (400, "BAD_REQUEST".to_string()),
            AppError::Timeout(_) => (408, "TIMEOUT".to_string()),
            AppError::Upstream(_) => (502, "UPSTREAM_ERROR".to_string()),
            AppError::Internal(_) => (500, "INTERNAL_ERROR".to_string()),
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
