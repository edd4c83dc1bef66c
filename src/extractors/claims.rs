use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    core::error::AppError,
    dtos::auth::Claims,
    services::auth as AuthService,
    state::AppState,
};

/// 自定义提取器：自动从 Header 中解析 Token 并验证
/// 如果验证失败，请求将直接被拒绝，不会进入 Handler
impl FromRequestParts<AppState> for Claims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // 管理员守卫已经校验过的请求，直接复用其结果
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(claims.clone());
        }

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::AuthError("Missing or invalid Authorization header".to_string()))?;

        AuthService::verify_token(&state.config, bearer.token())
    }
}
