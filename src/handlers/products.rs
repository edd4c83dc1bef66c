use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    core::error::AppError,
    dtos::{
        auth::Claims,
        product::{CreateProductRequest, ProductQuery, UpdateProductRequest},
        response::Res,
    },
    services::product as ProductService,
    state::AppState,
};

/// 商品列表，支持按名称、分类、厂商、是否推荐过滤，以及排序与分页。
pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ProductQuery>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;

    let response = ProductService::list_products(&state, query).await?;
    Ok(Res::with_data(response))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductService::get_product(&state, &id).await?;
    Ok(Res::with_data(product))
}

/// 新建商品（仅管理员）。`Claims` 由 `admin_guard` 放入请求扩展。
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateProductRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = ProductService::create_product(&state, &claims, payload).await?;
    Ok(Res::created("Product created successfully", product))
}

/// 部分更新商品（仅管理员）。
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateProductRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = ProductService::update_product(&state, &id, payload).await?;
    Ok(Res::with_data(product))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    ProductService::delete_product(&state, &id).await?;
    Ok(Res::<()>::with_msg("Product deleted successfully"))
}
