// src/handlers/auth.rs
use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    core::error::AppError,
    dtos::{
        auth::{Claims, LoginRequest, RegisterRequest},
        response::Res,
    },
    services::auth as AuthService,
    state::AppState,
};

/// 用户注册处理器。
///
/// # 功能说明
/// - 验证请求数据格式（使用 validator crate）
/// - 调用认证服务创建新用户并签发令牌
///
/// # 返回值
/// - `Ok(impl IntoResponse)`: 注册成功，返回201 Created和 `{user, token}`
/// - `Err(AppError)`: 校验失败 400，邮箱已存在 409
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = AuthService::register(&state, payload).await?;
    Ok(Res::created("User registered successfully", response))
}

/// 用户登录处理器。邮箱和密码都正确时返回 `{user, token}`，否则 401。
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = AuthService::login(&state, payload).await?;
    Ok(Res::with_data(response))
}

/// 获取当前登录用户的资料。
pub async fn me(
    claims: Claims,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let profile = AuthService::current_user(&state, &claims).await?;
    Ok(Res::with_data(profile))
}
