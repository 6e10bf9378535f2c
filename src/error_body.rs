use serde::Serialize;
use utoipa::ToSchema;

/// OpenAPI 文档用的错误响应体
#[derive(Serialize, ToSchema)]
pub struct ErrorBodyDoc {
    #[schema(example = "Failed to fetch balance")]
    pub error: String,
}
