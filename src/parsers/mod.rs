//! # 解析器模块
//!
//! 基于 html5ever / markup5ever_rcdom 的文档解析、遍历和序列化。
//!
//! # 模块组织
//!
//! - `html` - HTML 文档解析、DOM 操作、元数据、文本遍历与过滤

pub mod html;

// Re-export commonly used items for convenience
pub use html::{
    get_body, get_document_language, get_head, get_title, html_to_dom, is_forbidden,
    serialize_document, set_title, walk,
};
