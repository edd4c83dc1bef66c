// src/dtos/product.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::products;

#[derive(Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: String,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: String,

    pub company: Option<String>,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i64,
}

/// 部分更新：只有出现在请求体中的字段会被写入。
#[derive(Deserialize, Validate, Default)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Category must be between 1 and 50 characters"))]
    pub category: Option<String>,

    pub company: Option<String>,

    #[validate(url(message = "Image must be a valid URL"))]
    pub image: Option<String>,

    pub featured: Option<bool>,

    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i64>,
}

/// 商品列表查询参数，例如 `?name=chair&featured=true&sort=price,-name&page=2&limit=20`。
#[derive(Deserialize, Validate, Default, Debug)]
pub struct ProductQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<String>,

    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u64>,

    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u64>,
}

#[derive(Serialize, Debug, Clone)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub company: Option<String>,
    pub image: Option<String>,
    pub featured: bool,
    pub stock: i64,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<products::Model> for ProductResponse {
    fn from(product: products::Model) -> Self {
        Self {
            id: product.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: product.name,
            price: product.price,
            description: product.description,
            category: product.category,
            company: product.company,
            image: product.image,
            featured: product.featured,
            stock: product.stock,
            created_by: product.created_by.to_hex(),
            created_at: product.created_at.try_to_rfc3339_string().unwrap_or_default(),
            updated_at: product.updated_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}
