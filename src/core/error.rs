// src/core/error.rs
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{core::database::is_duplicate_key, dtos::response::Res};

/// 启动阶段的致命错误。任何一种都会让进程以退出码 1 结束。
#[derive(Error, Debug)]
pub enum StartupError {
    /// 必填环境变量缺失。
    #[error("{0} is not defined. Check your .env file.")]
    MissingEnv(&'static str),

    /// 配置构建或反序列化失败（如 PORT 不是数字、缺少 JWT_SECRET）。
    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// 连接串解析失败、ping 失败或建索引失败。
    #[error("MongoDB Connection Error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// 监听地址无效、端口被占用等。
    #[error("Server Startup Error: {0}")]
    Io(#[from] std::io::Error),
}

/// 应用程序统一错误类型。这个枚举定义了请求处理过程中所有可能发生的错误，
/// 覆盖了数据库、请求解析、验证、认证、授权等各个层面。
///
/// 通过实现 `IntoResponse` trait，任何 `AppError` 都可以直接转换为HTTP响应，
/// 确保错误信息以统一的 `Res` 格式返回给客户端。
#[derive(Error, Debug)]
pub enum AppError {
    /// 数据库相关错误。包装 mongodb 驱动的错误，自动转换。
    #[error("Database error: {0}")]
    DatabaseError(#[from] mongodb::error::Error),

    /// 输入验证错误。包装 validator crate 的 `ValidationErrors`，自动转换。
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// 请求体不是合法的 JSON，或缺少必填字段。
    #[error("Invalid request body: {0}")]
    JsonRejection(#[from] JsonRejection),

    /// 查询参数无法解析。
    #[error("Invalid query string: {0}")]
    QueryRejection(#[from] QueryRejection),

    /// 其他参数错误，如不支持的排序字段。返回400 Bad Request。
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 认证错误。如令牌无效、邮箱密码错误等。返回401 Unauthorized。
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// 授权错误。如权限不足、来源不在 CORS 白名单内。返回403 Forbidden。
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// 资源未找到错误。返回404 Not Found。
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 资源冲突错误。如邮箱已被注册。返回409 Conflict。
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 服务器内部错误。用于未预期的错误情况。返回500 Internal Server Error。
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 对于内部错误（如数据库），只返回通用的错误消息，详细信息写入日志。
        let (status, msg) = match &self {
            AppError::DatabaseError(e) if is_duplicate_key(e) => {
                tracing::warn!("⚠️ Duplicate key: {}", e);
                (StatusCode::CONFLICT, "Duplicate value entered".to_string())
            }
            AppError::DatabaseError(e) => {
                tracing::error!("❌ Database Error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database service error".to_string())
            }
            AppError::InternalServerError(msg) => {
                tracing::error!("❌ Internal Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::ValidationError(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::JsonRejection(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::QueryRejection(e) => (StatusCode::BAD_REQUEST, e.body_text()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        };

        Res::<()>::with_error(status, &msg).into_response()
    }
}
