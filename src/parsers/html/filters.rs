//! 禁止修改的节点过滤器
//!
//! 调度器在处理新增节点前使用：用户正在编辑的区域和不渲染/可执行的元素
//! 永远不交给替换逻辑。遍历器自身不使用这个过滤器。

use markup5ever_rcdom::{Handle, NodeData};

use super::dom::{get_node_attr, get_node_name, get_parent_node};

/// 禁止修改的元素标签
pub const FORBIDDEN_TAG_NAMES: &[&str] = &[
    "textarea", "input", "script", "noscript", "template", "style",
];

/// 节点不应被修改时返回 `true`
///
/// 条件：节点本身或其父节点可编辑，或者节点标签在禁止列表中。
pub fn is_forbidden(node: &Handle) -> bool {
    if is_content_editable(node) {
        return true;
    }

    if let Some(parent) = get_parent_node(node) {
        if is_content_editable(&parent) {
            return true;
        }
    }

    get_node_name(node)
        .map(|name| FORBIDDEN_TAG_NAMES.contains(&name.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 元素是否处于可编辑区域
///
/// 按 HTML 继承规则，由最近的带 `contenteditable` 属性的祖先元素（含自身）决定。
/// 非元素节点始终返回 `false`。
pub fn is_content_editable(node: &Handle) -> bool {
    if !matches!(node.data, NodeData::Element { .. }) {
        return false;
    }

    let mut current = Some(node.clone());
    while let Some(element) = current {
        if let Some(value) = get_node_attr(&element, "contenteditable") {
            match value.trim().to_ascii_lowercase().as_str() {
                "" | "true" | "plaintext-only" => return true,
                "false" => return false,
                // 无效值按继承处理
                _ => {}
            }
        }
        current = get_parent_node(&element);
    }

    false
}
