//! 统一错误处理模块
//!
//! 定义应用级错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm::LlmError;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM 调用错误
    #[error("{0}")]
    Llm(#[from] LlmError),

    /// 模型返回的 JSON 不符合分析结果结构
    #[error("Model returned malformed analysis: {0}")]
    InvalidModelOutput(String),

    /// 请求体校验失败
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Llm(_)
            | AppError::InvalidModelOutput(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut detail = self.to_string();
        if detail.is_empty() {
            detail = status
                .canonical_reason()
                .unwrap_or("Server Error")
                .to_string();
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
