// src/entity/products.rs
use mongodb::{
    bson::{oid::ObjectId, DateTime},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use crate::core::constants::COLLECTION_PRODUCTS;

/// `products` 集合中的文档。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub stock: i64,
    /// 创建者的用户 ID（来自 JWT 的 sub）
    pub created_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

pub fn collection(db: &Database) -> Collection<Model> {
    db.collection(COLLECTION_PRODUCTS)
}
