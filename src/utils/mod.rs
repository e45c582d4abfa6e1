//! # 工具模块
//!
//! - `logging` - 基于 tracing-subscriber 的日志初始化

pub mod logging;

// Re-export commonly used items for convenience
pub use logging::init_logging;
