// src/middleware/cors.rs
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::core::{constants::ALLOWED_ORIGINS, error::AppError};

pub fn is_allowed_origin(origin: &str) -> bool {
    ALLOWED_ORIGINS.contains(&origin)
}

/// 跨域响应头：只回显白名单内的来源，允许携带 Cookie / Authorization。
pub fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// 来源守卫：`CorsLayer` 只负责“不给响应头”，请求本身仍会被执行。
/// 这里在最外层直接拒绝带有非白名单 `Origin` 的请求（包括预检请求）。
/// 没有 `Origin` 头的请求（同源、curl、服务端调用）直接放行。
pub async fn origin_guard(req: Request, next: Next) -> Result<Response, AppError> {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        let allowed = origin.to_str().map(is_allowed_origin).unwrap_or(false);
        if !allowed {
            tracing::warn!("🚫 Blocked origin: {:?}", origin);
            return Err(AppError::Forbidden("Not allowed by CORS".to_string()));
        }
    }

    Ok(next.run(req).await)
}
