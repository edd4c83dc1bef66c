use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry, util::SubscriberInitExt, EnvFilter,
};

use crate::core::constants::DEFAULT_LOG_LEVEL;

/// 日志文件目录与文件名前缀（按天滚动，如 `logs/woodhy-api.log.2026-10-19`）。
const LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "woodhy-api.log";

/// 初始化全局日志：控制台（带颜色）+ 按天滚动的文件（无颜色）。
///
/// 日志目录无法创建时（只读文件系统、`logs` 是一个普通文件等）退化为只输出到控制台，
/// 启动流程照常进行，后续的启动错误仍然能被记录下来。
///
/// 返回的 guard 必须一直持有到进程结束，drop 时会把缓冲区中的日志刷到文件里。
pub fn init(log_level: &str) -> Option<WorkerGuard> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(LOG_DIR);

    let (file_layer, guard, file_error) = match appender {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_file(true)
                .with_line_number(true)
                .with_target(false);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    registry()
        .with(filter(log_level))
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!("⚠️ File logging disabled, writing to stdout only: {}", e);
    }

    guard
}

/// RUST_LOG 写错时不应该让服务起不来，回退到默认级别。
fn filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
