use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const ADDRESS_REQUIRED: &str = "Address is required";
pub const BALANCE_FETCH_FAILED: &str = "Failed to fetch balance";
pub const RATE_LIMITED: &str = "Too many requests, please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorCode {
    BadRequest,
    NotFound,
    RateLimit,
    ExternalServiceError,
}

impl AppErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppErrorCode::BadRequest => "bad_request",
            AppErrorCode::NotFound => "not_found",
            AppErrorCode::RateLimit => "rate_limit",
            AppErrorCode::ExternalServiceError => "external_service_error",
        }
    }
}

/// 统一错误类型；响应体固定为 `{ "error": message }`
#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub message: String,
    pub status: StatusCode,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::debug!(
            code = self.code.as_str(),
            status = %self.status,
            message = %self.message,
            "Request rejected"
        );
        let body = ErrorBody {
            error: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            code: AppErrorCode::BadRequest,
            message: msg.into(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    /// 注册请求缺少地址
    pub fn address_required() -> Self {
        Self::bad_request(ADDRESS_REQUIRED)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            code: AppErrorCode::NotFound,
            message: msg.into(),
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn rate_limit_exceeded() -> Self {
        Self {
            code: AppErrorCode::RateLimit,
            message: RATE_LIMITED.to_string(),
            status: StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// 上游链数据提供者失败：不向调用方暴露具体原因
    pub fn external_service_error(msg: impl Into<String>) -> Self {
        Self {
            code: AppErrorCode::ExternalServiceError,
            message: msg.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn balance_unavailable() -> Self {
        Self::external_service_error(BALANCE_FETCH_FAILED)
    }
}
