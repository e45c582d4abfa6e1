//! # 替换模块
//!
//! - `table` - 内置替换表、词条模式和替换文本
//! - `engine` - 按激活语言展开的文本替换器

pub mod engine;
pub mod table;

pub use engine::Substituter;
pub use table::{
    Category, LanguageEntry, PatternEntry, ReplacementPair, ReplacementTable, TableError,
    TableResult, Term, TermGroup, BUILTIN_TABLE,
};
