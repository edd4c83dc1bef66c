use config::{Config as ConfigLoader, ConfigError, Environment};
use secrecy::SecretString;
use serde::Deserialize;

use crate::core::{
    constants::{DEFAULT_LOG_LEVEL, MAX_JWT_EXPIRATION},
    error::StartupError,
};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// MongoDB 连接串（敏感信息，必填）
    pub mongo_uri: SecretString,

    /// 数据库名；为空时依次回退到连接串中的默认库、`woodhy`
    #[serde(default)]
    pub mongo_db_name: Option<String>,

    /// JWT 签名密钥（敏感信息，必填）
    pub jwt_secret: SecretString,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_log")]
    pub rust_log: String,

    /// 访问令牌有效期（秒）
    #[serde(default = "default_jwt_exp")]
    pub jwt_expiration: i64,
}

impl Config {
    /// 从进程环境变量加载配置。调用方负责提前加载 `.env`。
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_environment(Environment::default().try_parsing(true))
    }

    /// 从给定的环境变量源加载配置。
    ///
    /// `MONGO_URI` 缺失或为空时返回 [`StartupError::MissingEnv`]，
    /// 与其余反序列化错误区分开，方便启动流程给出明确提示。
    pub fn from_environment(source: Environment) -> Result<Self, StartupError> {
        // 注意：Environment::default() 会把 `MONGO_URI` 映射到 `mongo_uri`，
        // try_parsing(true) 会把 "5000" 解析成数字。
        let settings = ConfigLoader::builder().add_source(source).build()?;

        let has_mongo_uri = settings
            .get_string("mongo_uri")
            .map(|uri| !uri.trim().is_empty())
            .unwrap_or(false);
        if !has_mongo_uri {
            return Err(StartupError::MissingEnv("MONGO_URI"));
        }

        let loaded: Self = settings.try_deserialize()?;

        // 有效期参与时间戳运算，非正数或过大的值直接拒绝
        if !(1..=MAX_JWT_EXPIRATION).contains(&loaded.jwt_expiration) {
            return Err(StartupError::Config(ConfigError::Message(format!(
                "JWT_EXPIRATION must be between 1 and {} seconds, got {}",
                MAX_JWT_EXPIRATION, loaded.jwt_expiration
            ))));
        }

        Ok(loaded)
    }
}

// --- 默认值函数 ---
fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_log() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_jwt_exp() -> i64 {
    86400 * 30
} // 30 days
