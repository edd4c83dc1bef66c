// src/core/database.rs
use std::time::Duration;

use mongodb::{
    bson::doc,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};
use secrecy::ExposeSecret;

use crate::{
    core::{
        config::Config,
        constants::{COLLECTION_PRODUCTS, COLLECTION_USERS, DEFAULT_DB_NAME, DUPLICATE_KEY_CODE},
        error::StartupError,
    },
    entity::{products, users},
};

/// 建立 MongoDB 连接并确认其可用。
///
/// 驱动本身是惰性连接的：`Client::with_options` 只解析配置、启动后台监控，
/// 真正的网络往返发生在第一次操作时。这里主动对 `admin` 库发送一次 `ping`，
/// 确保在开放 HTTP 端口之前数据库已经可达。重连与连接池全部交给驱动处理。
pub async fn connect(config: &Config) -> Result<Database, StartupError> {
    let mut options = ClientOptions::parse(config.mongo_uri.expose_secret()).await?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.server_selection_timeout = Some(Duration::from_secs(10));

    let db_name = database_name(config, &options);
    let hosts = options
        .hosts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");

    let client = Client::with_options(options)?;
    client.database("admin").run_command(doc! { "ping": 1 }).await?;

    tracing::info!("✅ MongoDB Connected: {} (db: {})", hosts, db_name);
    Ok(client.database(&db_name))
}

/// 数据库名的选择顺序：MONGO_DB_NAME → 连接串中的默认库 → `woodhy`。
fn database_name(config: &Config, options: &ClientOptions) -> String {
    config
        .mongo_db_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .or(options.default_database.as_deref())
        .unwrap_or(DEFAULT_DB_NAME)
        .to_string()
}

/// 创建业务所需的索引。`create_index` 是幂等的，每次启动都可以安全调用。
pub async fn ensure_indexes(db: &Database) -> Result<(), StartupError> {
    let unique_email = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    users::collection(db).create_index(unique_email).await?;

    let by_category = IndexModel::builder().keys(doc! { "category": 1 }).build();
    products::collection(db).create_index(by_category).await?;

    tracing::info!(
        "✅ Indexes ensured on `{}` and `{}`.",
        COLLECTION_USERS,
        COLLECTION_PRODUCTS
    );
    Ok(())
}

/// 判断是否为唯一索引冲突（E11000）。
pub fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}
