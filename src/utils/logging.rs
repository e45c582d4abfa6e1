//! 日志初始化
//!
//! 级别取自 `RETEXT_LOG_LEVEL`，设置 `NO_COLOR` 时关闭 ANSI 颜色。

use tracing::Level;

use crate::env::{self, EnvResult, EnvVar};

/// 将 `RETEXT_LOG_LEVEL` 的取值转换为 `tracing` 级别
pub fn parse_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// 安装全局 fmt 订阅者
///
/// 已经安装过订阅者时返回 `Ok(false)`。
pub fn init_logging() -> EnvResult<bool> {
    let level = parse_level(&env::core::LogLevel::get()?);
    let no_color = env::core::NoColor::get()?;

    let installed = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(!no_color)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("日志级别: {}", level);
    }
    Ok(installed)
}
