use mongodb::Database;
use std::sync::Arc;
use crate::core::config::Config;

/// 所有请求处理器共享的状态。数据库句柄在启动时显式创建并传入，
/// 不使用全局单例。
#[derive(Clone)]
pub struct AppState {
    /// MongoDB 数据库句柄，内部自带连接池，克隆开销很小
    pub db: Database,
    /// 全局配置，使用 Arc 包装以实现廉价克隆
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
