use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// 应用统一错误类型
///
/// 徽章由 `<img>` 标签直接引用，客户端不会解析响应体，
/// 因此错误响应只携带状态码、不携带正文。
#[derive(Error, Debug, Clone, utoipa::ToSchema)]
pub enum AppError {
    /// 上游平台未找到该 handle（或上游返回业务失败）
    #[error("未找到: {0}")]
    NotFound(String),

    /// 网络请求错误（上游不可达、非 2xx 等）
    #[error("网络错误: {0}")]
    Network(String),

    /// 上游请求超时（包含 connect/read 等阶段）
    #[error("请求超时: {0}")]
    Timeout(String),

    /// 参数校验错误（非法颜色、非法 id_suffix 等）
    #[error("参数校验错误: {0}")]
    Validation(String),

    /// 内部服务器错误
    #[error("内部错误: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 上游失败一律按 404 处理：对徽章消费方而言
            // “查不到评级”与“handle 不存在”不作区分，且绝不重试。
            AppError::NotFound(_) | AppError::Network(_) | AppError::Timeout(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!("请求失败: {} -> {}", self, status);
        status.into_response()
    }
}

// =============== Error conversions for common external errors ===============

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}
