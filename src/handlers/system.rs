use axum::{response::IntoResponse, Json};
use serde_json::json;

use crate::core::{constants::WELCOME_MESSAGE, error::AppError};

/// `GET /`：固定的欢迎语，不经过统一响应信封。
pub async fn welcome() -> impl IntoResponse {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

/// 兜底路由：所有未匹配的路径都返回 404。
pub async fn not_found() -> AppError {
    AppError::NotFound("Route does not exist".to_string())
}
