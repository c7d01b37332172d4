use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 应用统一错误类型。
///
/// `Display` 即对外 JSON 中 `error` 字段的内容，因此各变体直接携带
/// 面向调用方的完整消息。前端以字符串匹配 `No file uploaded` /
/// `Invalid uploader` 两条校验消息，改动措辞属于破坏性变更。
#[derive(Error, Debug)]
pub enum AppError {
    /// 请求校验失败（缺少文件 / uploader 不在白名单）
    #[error("{0}")]
    Validation(String),

    /// 上传内容超出配置的大小上限
    #[error("File exceeds the maximum upload size ({limit} bytes)")]
    PayloadTooLarge {
        /// 配置的上限（字节）
        limit: u64,
    },

    /// 上游转发失败（不可达 / 超时 / 非 2xx / 响应不是合法 JSON）
    #[error("{0}")]
    Upstream(String),

    /// 内部错误（暂存盘写入失败等，与上游无关）
    #[error("{0}")]
    Internal(String),
}

/// 对外统一的错误响应体：`{"error": "<message>"}`。
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// 人类可读的错误消息
    #[schema(example = "Invalid uploader")]
    pub error: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };

        let mut res = Json(body).into_response();
        *res.status_mut() = status;
        res
    }
}

// =============== Error conversions for common external errors ===============

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Upstream(format!("upstream request timed out: {err}"))
        } else {
            AppError::Upstream(err.to_string())
        }
    }
}
