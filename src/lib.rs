//! # Retext Library
//!
//! 在 HTML 文档的文本节点上持续执行词条替换：首次全量遍历之后，
//! 只对变更通知中新增的节点重新扫描，并以固定间隔节流。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型和运行选项
//! - `env` - 环境变量配置
//! - `replacement` - 替换表和文本替换引擎
//! - `parsers` - DOM 解析、遍历、过滤和序列化
//! - `observer` - 文档宿主与变更观察
//! - `scheduler` - 变更批处理调度器
//! - `locale` - 语言检测
//! - `bootstrap` - 启动流程
//! - `utils` - 日志等工具函数

pub mod bootstrap;
pub mod core;
pub mod env;
pub mod locale;
pub mod observer;
pub mod parsers;
pub mod replacement;
pub mod scheduler;
pub mod utils;

// Re-export commonly used items for convenience
pub use bootstrap::{bootstrap, Bootstrap};
pub use crate::core::*;
pub use locale::{LanguageResolution, LocaleError, LocaleSource, StaticLocales, SystemLocales};
pub use observer::{DocumentHost, MutationKind, MutationRecord, Notification, ObserverOptions};
pub use parsers::*;
pub use replacement::{ReplacementTable, Substituter, TableError};
pub use scheduler::{Scheduler, SchedulerHandle, SchedulerStats};
pub use utils::*;
