// src/core/enums.rs

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// 用户角色枚举
/// 同时支持：
/// 1. BSON / JSON 序列化 (Serde) - 存为字符串 "admin" / "user"
/// 2. 字符串转换 (Strum) - JWT 中的 role 字段与枚举互转
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")] // to_string() 输出小写
#[serde(rename_all = "lowercase")]    // JSON / BSON 输出小写
pub enum UserRole {
    Admin,
    User,
}
