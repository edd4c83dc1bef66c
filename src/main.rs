// src/main.rs
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // 启动失败时错误已经在 run() 内部写入日志，这里只负责退出码
    match woodhy_api::start::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
