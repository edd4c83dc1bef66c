use argon2::{
    password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    Database,
};
use rand::rngs::OsRng;
use secrecy::ExposeSecret;

use crate::{
    core::{
        config::Config,
        constants::{COLLECTION_BOOTSTRAP, FIRST_ADMIN_CLAIM},
        database::is_duplicate_key,
        enums::UserRole,
        error::AppError,
    },
    dtos::auth::{AuthResponse, Claims, LoginRequest, RegisterRequest, UserProfile},
    entity::users,
    state::AppState,
};

/// 生成访问令牌（Access Token）。纯函数，只负责根据用户信息签发 JWT。
///
/// # 参数
/// - `config`: 应用程序配置，包含 JWT 密钥和过期时间。
/// - `user_id`: 用户 ObjectId 的十六进制字符串。
/// - `name`: 用户名，写入令牌便于前端展示。
/// - `role`: 用户角色，用于商品写操作的权限判断。
pub fn generate_token(
    config: &Config,
    user_id: &str,
    name: &str,
    role: UserRole,
) -> Result<String, AppError> {
    let exp = (Utc::now() + Duration::seconds(config.jwt_expiration)).timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token generation failed: {}", e)))
}

/// 校验令牌签名与有效期，返回其中的声明。提取器和管理员守卫共用这一逻辑。
pub fn verify_token(config: &Config, token: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());

    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::warn!("⚠️ Token validation failed: {}", e);
            AppError::AuthError("Invalid or expired token".to_string())
        })
}

fn issue(config: &Config, user: users::Model) -> Result<AuthResponse, AppError> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::InternalServerError("User without _id".to_string()))?
        .to_hex();
    let token = generate_token(config, &user_id, &user.name, user.role)?;

    Ok(AuthResponse {
        user: user.into(),
        token,
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 认领“首个管理员”名额。认领文档的 `_id` 是固定值，
/// 并发注册时只有一个插入能成功，其余请求收到唯一键冲突。
async fn claim_first_admin(db: &Database, user_id: ObjectId) -> Result<bool, AppError> {
    let claim = doc! {
        "_id": FIRST_ADMIN_CLAIM,
        "user_id": user_id,
        "claimed_at": DateTime::now(),
    };

    match db.collection::<Document>(COLLECTION_BOOTSTRAP).insert_one(claim).await {
        Ok(_) => Ok(true),
        Err(e) if is_duplicate_key(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// 用户注册服务：哈希密码、写入数据库并直接签发令牌。
///
/// 所有账号先以普通用户写入；随后认领首个管理员名额成功的那一个被提升为管理员。
/// 邮箱重复（唯一索引冲突）时返回 409，且不会占用管理员名额。
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<AuthResponse, AppError> {
    // Argon2 + 随机盐
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(format!("Hash failed: {}", e)))?
        .to_string();

    let now = DateTime::now();
    let mut user = users::Model {
        id: None,
        name: req.name.trim().to_string(),
        email: normalize_email(&req.email),
        password_hash,
        role: UserRole::User,
        created_at: now,
        updated_at: now,
    };

    let collection = users::collection(&state.db);
    let inserted = collection.insert_one(&user).await.map_err(|e| {
        if is_duplicate_key(&e) {
            AppError::Conflict("Email already exists".to_string())
        } else {
            AppError::DatabaseError(e)
        }
    })?;
    let user_id = inserted
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::InternalServerError("Inserted user without ObjectId".to_string()))?;
    user.id = Some(user_id);

    if claim_first_admin(&state.db, user_id).await? {
        collection
            .update_one(
                doc! { "_id": user_id },
                doc! { "$set": { "role": UserRole::Admin.to_string() } },
            )
            .await?;
        user.role = UserRole::Admin;
    }

    tracing::info!("👤 User registered: {} ({})", user.email, user.role);
    issue(&state.config, user)
}

/// 用户登录服务。邮箱不存在与密码错误返回同一条消息，避免泄露账号是否存在。
pub async fn login(state: &AppState, req: LoginRequest) -> Result<AuthResponse, AppError> {
    let user = users::collection(&state.db)
        .find_one(doc! { "email": normalize_email(&req.email) })
        .await?
        .ok_or(AppError::AuthError("Invalid credentials".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::InternalServerError("Auth failed".to_string()))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::AuthError("Invalid credentials".to_string()))?;

    issue(&state.config, user)
}

/// 根据令牌中的用户 ID 读取当前用户资料。
pub async fn current_user(state: &AppState, claims: &Claims) -> Result<UserProfile, AppError> {
    let uid = ObjectId::parse_str(&claims.sub)
        .map_err(|_| AppError::AuthError("Invalid user id in token".to_string()))?;

    let user = users::collection(&state.db)
        .find_one(doc! { "_id": uid })
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(user.into())
}
