//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，供 `RetextOptions::from_env` 和日志初始化使用

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 未设置且没有默认值时返回 `None`，而不是报错
    fn get_optional() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(Self::DEFAULT),
        }
    }
}

fn parse_millis(variable: &str, value: &str, max: u64) -> EnvResult<Duration> {
    let millis: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: variable.to_string(),
        message: "Must be a valid number of milliseconds".to_string(),
    })?;

    if millis == 0 {
        return Err(EnvError {
            variable: variable.to_string(),
            message: "Duration must be greater than 0".to_string(),
        });
    }

    if millis > max {
        return Err(EnvError {
            variable: variable.to_string(),
            message: format!("Duration too long (max {} ms)", max),
        });
    }

    Ok(Duration::from_millis(millis))
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 未设置 `RETEXT_LOG_LEVEL` 时的日志级别
    pub const DEFAULT_LOG_LEVEL: &str = "info";

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "RETEXT_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok(DEFAULT_LOG_LEVEL.to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 启用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 调度器相关环境变量
pub mod scheduler {
    use super::*;

    /// 两次批量处理之间的最短间隔
    pub struct DrainInterval;
    impl EnvVar<Duration> for DrainInterval {
        const NAME: &'static str = "RETEXT_DRAIN_INTERVAL_MS";
        const DEFAULT: Option<Duration> = Some(Duration::from_millis(250));
        const DESCRIPTION: &'static str = "Minimum delay between two mutation drains, in milliseconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_millis(Self::NAME, value, 10_000)
        }
    }
}

/// 语言检测相关环境变量
pub mod locale {
    use super::*;

    /// 首选语言查询超时，未设置时无限等待
    pub struct QueryTimeout;
    impl EnvVar<Duration> for QueryTimeout {
        const NAME: &'static str = "RETEXT_LOCALE_TIMEOUT_MS";
        const DEFAULT: Option<Duration> = None;
        const DESCRIPTION: &'static str =
            "Give up on the preferred-language query after this many milliseconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_millis(Self::NAME, value, 60_000)
        }
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION,
        Some(core::DEFAULT_LOG_LEVEL)
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::NoColor::NAME,
        core::NoColor::DESCRIPTION,
        core::NoColor::DEFAULT
    ));

    docs.push_str("\n## Scheduler Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        scheduler::DrainInterval::NAME,
        scheduler::DrainInterval::DESCRIPTION,
        scheduler::DrainInterval::DEFAULT
    ));

    docs.push_str("\n## Locale Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        locale::QueryTimeout::NAME,
        locale::QueryTimeout::DESCRIPTION,
        locale::QueryTimeout::DEFAULT
    ));

    docs
}
