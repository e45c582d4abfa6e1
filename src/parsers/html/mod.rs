//! HTML 文档处理模块
//!
//! - `dom`: 基础 DOM 操作（解析、节点读写、插入与移除）
//! - `metadata`: 文档语言、head/body 与标题
//! - `serializer`: 序列化功能
//! - `filters`: 禁止修改的节点过滤器
//! - `walker`: 文本节点遍历与替换

pub mod dom;
pub mod filters;
pub mod metadata;
pub mod serializer;
pub mod walker;

pub use dom::{
    create_element, create_text_node, detach_node, find_nodes, get_child_node_by_name,
    get_node_attr, get_node_name, get_parent_node, get_text, html_to_dom, insert_child,
    is_inclusive_ancestor, is_text_node, set_node_attr, set_text, text_content,
};
pub use filters::{is_content_editable, is_forbidden, FORBIDDEN_TAG_NAMES};
pub use metadata::{
    get_body, get_document_element, get_document_language, get_head, get_title,
    get_title_element, set_title,
};
pub use serializer::serialize_document;
pub use walker::{handle_text, walk, REJECTED_ELEMENTS};
