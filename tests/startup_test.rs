// tests/startup_test.rs
//
// 直接运行编译好的二进制，检查启动失败时的退出码。
use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn work_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("woodhy-api-{name}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn run_server_in(dir: &Path, envs: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_woodhy-api"))
        .env_clear()
        .envs(envs.iter().copied())
        .current_dir(dir)
        .output()
        .expect("failed to spawn server binary")
}

/// 在空的临时目录中运行，避免读到仓库里的 `.env`。
fn run_server(name: &str, envs: &[(&str, &str)]) -> Output {
    run_server_in(&work_dir(name), envs)
}

#[test]
fn exits_with_status_one_when_mongo_uri_is_missing() {
    let output = run_server("missing-uri", &[("JWT_SECRET", "secret")]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("MONGO_URI is not defined"), "{stdout}");
}

#[test]
fn exits_with_status_one_when_mongo_uri_is_malformed() {
    let output = run_server(
        "bad-uri",
        &[("MONGO_URI", "definitely-not-mongo"), ("JWT_SECRET", "secret")],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("MongoDB Connection Error"), "{stdout}");
}

#[test]
fn exits_with_status_one_when_port_is_not_a_number() {
    let output = run_server(
        "bad-port",
        &[
            ("MONGO_URI", "mongodb://127.0.0.1:27017"),
            ("JWT_SECRET", "secret"),
            ("PORT", "eighty"),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn falls_back_to_stdout_when_log_directory_cannot_be_created() {
    let dir = work_dir("logs-is-file");
    let logs = dir.join("logs");
    if logs.is_dir() {
        std::fs::remove_dir_all(&logs).unwrap();
    }
    std::fs::write(&logs, "").unwrap();

    let output = run_server_in(&dir, &[("JWT_SECRET", "secret")]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("File logging disabled"), "{stdout}");
    assert!(stdout.contains("MONGO_URI is not defined"), "{stdout}");
}
