//! 文档元数据
//!
//! 读取 `<html lang>`、`<head>`、`<body>` 以及文档标题

use markup5ever_rcdom::Handle;

use super::dom::{
    create_text_node, find_nodes, get_child_node_by_name, get_node_attr, insert_child,
};

/// 获取 `<html>` 元素
pub fn get_document_element(document: &Handle) -> Option<Handle> {
    get_child_node_by_name(document, "html")
}

/// 获取声明的文档语言（`<html lang>` 的原始值）
pub fn get_document_language(document: &Handle) -> Option<String> {
    get_document_element(document).and_then(|html| get_node_attr(&html, "lang"))
}

/// 获取 `<head>` 元素
pub fn get_head(document: &Handle) -> Option<Handle> {
    find_nodes(document, vec!["html", "head"]).into_iter().next()
}

/// 获取 `<body>` 元素
pub fn get_body(document: &Handle) -> Option<Handle> {
    find_nodes(document, vec!["html", "body"]).into_iter().next()
}

/// 获取文档中的第一个 `<title>` 元素
pub fn get_title_element(document: &Handle) -> Option<Handle> {
    find_nodes(document, vec!["title"]).into_iter().next()
}

/// 获取文档标题
///
/// 与浏览器的 `document.title` 一致：拼接 `<title>` 的直接文本子节点，
/// 去掉首尾空白并把连续的 ASCII 空白折叠为一个空格。
pub fn get_title(document: &Handle) -> Option<String> {
    let title = get_title_element(document)?;

    let mut raw = String::new();
    for child in title.children.borrow().iter() {
        if let Some(text) = super::dom::get_text(child) {
            raw.push_str(&text);
        }
    }

    Some(raw.split_ascii_whitespace().collect::<Vec<_>>().join(" "))
}

/// 设置文档标题
///
/// 用一个文本节点替换 `<title>` 的全部子节点；文档没有 `<title>` 时返回 `false`。
pub fn set_title(document: &Handle, value: &str) -> bool {
    let title = match get_title_element(document) {
        Some(title) => title,
        None => return false,
    };

    for child in title.children.borrow_mut().drain(..) {
        child.parent.set(None);
    }

    if !value.is_empty() {
        insert_child(&title, create_text_node(value), None);
    }

    true
}
