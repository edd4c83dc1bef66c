// src/services/product.rs
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::ReturnDocument,
};

use crate::{
    core::{
        constants::{DEFAULT_PAGE_SIZE, DEFAULT_PRODUCT_SORT, MAX_PAGE_SIZE, PRODUCT_SORT_FIELDS},
        error::AppError,
    },
    dtos::{
        auth::Claims,
        product::{
            CreateProductRequest, ProductListResponse, ProductQuery, ProductResponse,
            UpdateProductRequest,
        },
    },
    entity::products,
    state::AppState,
};

/// 把路径中的 id 解析成 ObjectId。格式不合法与查不到一样按 404 处理。
fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| not_found(id))
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("No product with id: {}", id))
}

/// 根据查询参数构建 MongoDB 过滤条件。
///
/// - `name`：不区分大小写的子串匹配（用户输入会先做正则转义）
/// - `category` / `company`：精确匹配
/// - `featured`：布尔匹配
pub fn build_filter(query: &ProductQuery) -> Document {
    let mut filter = Document::new();

    if let Some(name) = query.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        filter.insert("name", doc! { "$regex": regex::escape(name), "$options": "i" });
    }
    if let Some(category) = query.category.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("category", category);
    }
    if let Some(company) = query.company.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("company", company);
    }
    if let Some(featured) = query.featured {
        filter.insert("featured", featured);
    }

    filter
}

/// 把 `price,-name` 形式的排序参数转换为 `{ price: 1, name: -1 }`。
/// 只允许白名单内的字段，其余字段返回 400。
pub fn build_sort(sort: Option<&str>) -> Result<Document, AppError> {
    let mut sort_doc = Document::new();

    for field in sort.unwrap_or(DEFAULT_PRODUCT_SORT).split(',') {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }

        let (name, direction) = match field.strip_prefix('-') {
            Some(name) => (name, -1),
            None => (field, 1),
        };
        if !PRODUCT_SORT_FIELDS.contains(&name) {
            return Err(AppError::BadRequest(format!("Invalid sort field: {}", name)));
        }
        sort_doc.insert(name, direction);
    }

    if sort_doc.is_empty() {
        return build_sort(None);
    }
    Ok(sort_doc)
}

/// 根据页码计算需要跳过的文档数。乘法溢出或超出 i64（服务端 skip 的取值范围）时返回 400。
pub fn page_offset(page: u64, limit: u64) -> Result<u64, AppError> {
    page.saturating_sub(1)
        .checked_mul(limit)
        .filter(|skip| i64::try_from(*skip).is_ok())
        .ok_or_else(|| AppError::BadRequest(format!("Page {} is out of range", page)))
}

/// 商品列表：过滤 + 排序 + 分页，同时返回符合条件的总数。
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> Result<ProductListResponse, AppError> {
    let filter = build_filter(&query);
    let sort = build_sort(query.sort.as_deref())?;
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let skip = page_offset(page, limit)?;

    let collection = products::collection(&state.db);
    let total = collection.count_documents(filter.clone()).await?;

    let products: Vec<products::Model> = collection
        .find(filter)
        .sort(sort)
        .skip(skip)
        .limit(limit as i64)
        .await?
        .try_collect()
        .await?;

    Ok(ProductListResponse {
        products: products.into_iter().map(Into::into).collect(),
        total,
        page,
        limit,
    })
}

pub async fn get_product(state: &AppState, id: &str) -> Result<ProductResponse, AppError> {
    let oid = parse_id(id)?;

    products::collection(&state.db)
        .find_one(doc! { "_id": oid })
        .await?
        .map(Into::into)
        .ok_or_else(|| not_found(id))
}

pub async fn create_product(
    state: &AppState,
    claims: &Claims,
    req: CreateProductRequest,
) -> Result<ProductResponse, AppError> {
    let created_by = ObjectId::parse_str(&claims.sub)
        .map_err(|_| AppError::AuthError("Invalid user id in token".to_string()))?;

    let now = DateTime::now();
    let mut product = products::Model {
        id: None,
        name: req.name.trim().to_string(),
        price: req.price,
        description: req.description,
        category: req.category.trim().to_string(),
        company: req.company,
        image: req.image,
        featured: req.featured,
        stock: req.stock,
        created_by,
        created_at: now,
        updated_at: now,
    };

    let inserted = products::collection(&state.db).insert_one(&product).await?;
    product.id = inserted.inserted_id.as_object_id();

    tracing::info!("📦 Product created: {} by {}", product.name, claims.name);
    Ok(product.into())
}

/// 只把请求中出现的字段放进 `$set`；一个字段都没有时返回 `None`。
fn update_document(req: UpdateProductRequest) -> Option<Document> {
    let mut set = Document::new();

    if let Some(name) = req.name {
        set.insert("name", name.trim());
    }
    if let Some(price) = req.price {
        set.insert("price", price);
    }
    if let Some(description) = req.description {
        set.insert("description", description);
    }
    if let Some(category) = req.category {
        set.insert("category", category.trim());
    }
    if let Some(company) = req.company {
        set.insert("company", company);
    }
    if let Some(image) = req.image {
        set.insert("image", image);
    }
    if let Some(featured) = req.featured {
        set.insert("featured", featured);
    }
    if let Some(stock) = req.stock {
        set.insert("stock", stock);
    }

    if set.is_empty() {
        return None;
    }
    set.insert("updated_at", DateTime::now());
    Some(set)
}

pub async fn update_product(
    state: &AppState,
    id: &str,
    req: UpdateProductRequest,
) -> Result<ProductResponse, AppError> {
    let oid = parse_id(id)?;
    let set = update_document(req)
        .ok_or_else(|| AppError::BadRequest("No fields to update".to_string()))?;

    products::collection(&state.db)
        .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?
        .map(Into::into)
        .ok_or_else(|| not_found(id))
}

pub async fn delete_product(state: &AppState, id: &str) -> Result<(), AppError> {
    let oid = parse_id(id)?;

    let result = products::collection(&state.db)
        .delete_one(doc! { "_id": oid })
        .await?;
    if result.deleted_count == 0 {
        return Err(not_found(id));
    }

    tracing::info!("🗑️ Product deleted: {}", id);
    Ok(())
}
