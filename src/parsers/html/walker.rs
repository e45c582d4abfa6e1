//! 文本节点遍历器
//!
//! 以文档顺序深度优先遍历根节点下的文本节点并应用替换。
//!
//! - 不进入 `style` / `script` 元素（根节点本身也是如此）
//! - 跳过空白文本节点
//! - 根节点本身不会被访问，只访问其后代
//!
//! ```ignore
//! let substituter = Substituter::new(&ReplacementTable::builtin()?, "en")?;
//! let rewritten = walk(&body, &substituter);
//! ```

use markup5ever_rcdom::{Handle, NodeData};

use crate::replacement::Substituter;

use super::dom::{get_node_name, get_text, set_text};

/// 遍历时整棵子树都会被拒绝的元素
pub const REJECTED_ELEMENTS: &[&str] = &["style", "script"];

/// 遍历 `root` 的后代文本节点并替换其内容
///
/// 返回内容实际发生变化的文本节点数量。
pub fn walk(root: &Handle, substituter: &Substituter) -> usize {
    if is_rejected_element(root) {
        return 0;
    }

    root.children
        .borrow()
        .iter()
        .map(|child| visit(child, substituter))
        .sum()
}

fn visit(node: &Handle, substituter: &Substituter) -> usize {
    match node.data {
        NodeData::Text { ref contents } => {
            if is_blank_text(&contents.borrow()) {
                return 0;
            }
            usize::from(handle_text(node, substituter))
        }
        NodeData::Element { .. } if is_rejected_element(node) => 0,
        _ => node
            .children
            .borrow()
            .iter()
            .map(|child| visit(child, substituter))
            .sum(),
    }
}

/// 替换单个文本节点的内容
///
/// 内容不变时不写回；非文本节点返回 `false`。
pub fn handle_text(node: &Handle, substituter: &Substituter) -> bool {
    let current = match get_text(node) {
        Some(current) => current,
        None => return false,
    };

    let replaced = substituter.substitute(&current);
    if replaced == current {
        return false;
    }

    tracing::trace!("替换文本节点: {:?} -> {:?}", current, replaced);
    set_text(node, &replaced)
}

/// 文本是否为空或只含空白
///
/// 空白包括 Unicode 空白字符以及 U+FEFF（BOM）。
fn is_blank_text(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_whitespace() || c == '\u{feff}')
}

fn is_rejected_element(node: &Handle) -> bool {
    get_node_name(node)
        .map(|name| {
            REJECTED_ELEMENTS
                .iter()
                .any(|rejected| name.eq_ignore_ascii_case(rejected))
        })
        .unwrap_or(false)
}
