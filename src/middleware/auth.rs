use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::str::FromStr;

use crate::{
    core::{enums::UserRole, error::AppError},
    services::auth as AuthService,
    state::AppState,
};

/// 管理员权限守卫中间件。强制验证 JWT 令牌，并要求角色为管理员（Admin）。
/// 用于保护商品的新建、修改、删除接口。
///
/// # 工作原理
/// 1. 从 HTTP Authorization 头部提取 Bearer 令牌（必须提供，否则 401）。
/// 2. 校验令牌签名和有效期（失败 401）。
/// 3. 角色不是 Admin 时返回 403。
/// 4. 校验通过后把 `Claims` 放进请求扩展，处理器可以直接取用，无需再次解码。
///
/// # 使用方式
/// `post(handler).route_layer(middleware::from_fn_with_state(state.clone(), admin_guard))`
pub async fn admin_guard(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::AuthError("Missing token".to_string()))?;

    let claims = AuthService::verify_token(&state.config, token)?;

    // 角色字符串无法识别时按普通用户处理
    let role = UserRole::from_str(&claims.role).unwrap_or(UserRole::User);
    if role != UserRole::Admin {
        tracing::warn!("🚫 Admin access denied: {}", claims.name);
        return Err(AppError::Forbidden("Requires Administrator privileges".to_string()));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
