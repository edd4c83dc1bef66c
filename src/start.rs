// src/start.rs
use std::net::SocketAddr;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;

use crate::{
    core::{
        config::Config,
        constants::DEFAULT_LOG_LEVEL,
        database,
        error::StartupError,
        log,
    },
    routes,
    state::AppState,
};

/// 启动并运行应用程序。
///
/// 这个函数执行以下步骤：
/// 1. 加载 `.env` 与环境变量配置
/// 2. 初始化日志系统
/// 3. 连接 MongoDB 并确认可用，确保索引存在
/// 4. 数据库就绪后才绑定端口并启动 HTTP 服务器
/// 5. 监听系统信号以实现优雅关闭
///
/// 任何一步失败都会记录日志并返回错误，由 `main` 转换为退出码 1。
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();

    // 日志级别来自配置；配置本身加载失败时用默认级别，保证错误能被记录下来。
    let loaded = Config::from_env();
    let log_level = loaded
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |config| config.rust_log.as_str());
    let _guard = log::init(log_level);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ {}", e);
            return Err(e);
        }
    };
    tracing::info!("🔍 Config loaded successfully.");

    serve(config).await.inspect_err(|e| tracing::error!("❌ {}", e))
}

async fn serve(config: Config) -> Result<(), StartupError> {
    let db = database::connect(&config).await?;
    database::ensure_indexes(&db).await?;
    tracing::info!("✅ Successfully connected to MongoDB");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid address {}:{}: {}", config.host, config.port, e),
            )
        })?;

    let listener = TcpListener::bind(addr).await?;
    let port = config.port;
    let app = routes::create_router(AppState::new(db, config));

    tracing::info!("🚀 Server is running on port {}...", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped.");
    Ok(())
}

/// 监听系统关闭信号：Ctrl+C（SIGINT）或 SIGTERM，任一到达即返回。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("❌ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    // 非 Unix 系统上用一个永不完成的 future 占位
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("🛑 Signal received, starting graceful shutdown...");
}
