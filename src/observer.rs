//! 文档宿主与变更观察
//!
//! 在内存 DOM 上模拟浏览器的 MutationObserver：通过 [`DocumentHost`] 的编辑方法修改文档时
//! 生成变更记录，按观察者的根节点和选项分发，并在 [`DocumentHost::flush`] 时
//! 以一批记录（一个 [`Notification`]）的形式投递给调度器。
//!
//! 替换逻辑直接写入文本节点，不经过宿主，因此不会产生新的变更记录。

use std::rc::Rc;

use markup5ever_rcdom::{Handle, RcDom};

use crate::core::RetextError;
use crate::parsers::html::{
    detach_node, get_body, get_head, get_title_element, html_to_dom, insert_child,
    is_inclusive_ancestor, is_text_node, set_text as write_text, set_title as write_title,
};
use crate::scheduler::SchedulerHandle;

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// 子节点增删
    ChildList,
    /// 文本内容变化
    CharacterData,
}

/// 单条变更记录
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub kind: MutationKind,
    /// 发生变化的节点（子节点增删时为父节点）
    pub target: Handle,
    /// 新增节点，保持插入顺序
    pub added_nodes: Vec<Handle>,
    /// 移除的节点
    pub removed_nodes: Vec<Handle>,
}

impl MutationRecord {
    pub fn child_list(target: Handle, added_nodes: Vec<Handle>, removed_nodes: Vec<Handle>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added_nodes,
            removed_nodes,
        }
    }

    pub fn character_data(target: Handle) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
        }
    }
}

/// 一次投递给观察者的变更记录批次
#[derive(Debug, Clone, Default)]
pub struct Notification {
    pub records: Vec<MutationRecord>,
}

impl Notification {
    pub fn new(records: Vec<MutationRecord>) -> Self {
        Self { records }
    }

    /// 按顺序迭代全部新增节点
    pub fn added_nodes(&self) -> impl Iterator<Item = &Handle> {
        self.records.iter().flat_map(|record| record.added_nodes.iter())
    }
}

/// 观察选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserverOptions {
    pub child_list: bool,
    pub character_data: bool,
    pub subtree: bool,
}

impl ObserverOptions {
    /// 观察整棵子树的子节点与文本变化
    pub const fn subtree_changes() -> Self {
        Self {
            child_list: true,
            character_data: true,
            subtree: true,
        }
    }

    fn accepts(&self, kind: MutationKind) -> bool {
        match kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::CharacterData => self.character_data,
        }
    }
}

/// 观察者标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

struct Registration {
    id: ObserverId,
    root: Handle,
    options: ObserverOptions,
    sink: SchedulerHandle,
    pending: Vec<MutationRecord>,
}

impl Registration {
    fn wants(&self, record: &MutationRecord) -> bool {
        if !self.options.accepts(record.kind) {
            return false;
        }

        if Rc::ptr_eq(&self.root, &record.target) {
            return true;
        }

        self.options.subtree && is_inclusive_ancestor(&self.root, &record.target)
    }
}

/// 持有文档并模拟变更观察的宿主
pub struct DocumentHost {
    dom: RcDom,
    observers: Vec<Registration>,
    next_id: usize,
}

impl DocumentHost {
    pub fn new(dom: RcDom) -> Self {
        Self {
            dom,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// 从 UTF-8 HTML 文本创建宿主
    pub fn parse(html: &str) -> Result<Self, RetextError> {
        Ok(Self::new(html_to_dom(html.as_bytes(), "utf-8")?))
    }

    pub fn dom(&self) -> &RcDom {
        &self.dom
    }

    pub fn document(&self) -> &Handle {
        &self.dom.document
    }

    pub fn head(&self) -> Option<Handle> {
        get_head(&self.dom.document)
    }

    pub fn body(&self) -> Option<Handle> {
        get_body(&self.dom.document)
    }

    /// 注册观察者
    pub fn observe(
        &mut self,
        root: &Handle,
        options: ObserverOptions,
        sink: SchedulerHandle,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;

        self.observers.push(Registration {
            id,
            root: root.clone(),
            options,
            sink,
            pending: Vec::new(),
        });

        tracing::debug!("注册观察者 {:?}", id);
        id
    }

    /// 注销观察者，丢弃尚未投递的记录
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|registration| registration.id != id);
        before != self.observers.len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// 尚未投递的记录数
    pub fn pending_records(&self) -> usize {
        self.observers
            .iter()
            .map(|registration| registration.pending.len())
            .sum()
    }

    /// 追加子节点
    pub fn append_child(&mut self, parent: &Handle, child: Handle) {
        self.insert_before(parent, child, None);
    }

    /// 在 `reference` 之前插入子节点；节点已在文档中时先移除
    pub fn insert_before(&mut self, parent: &Handle, child: Handle, reference: Option<&Handle>) {
        if let Some(old_parent) = detach_node(&child) {
            self.record(MutationRecord::child_list(
                old_parent,
                vec![],
                vec![child.clone()],
            ));
        }

        insert_child(parent, child.clone(), reference);
        self.record(MutationRecord::child_list(parent.clone(), vec![child], vec![]));
    }

    /// 移除子节点；`child` 不属于 `parent` 时返回 `false`
    pub fn remove_child(&mut self, parent: &Handle, child: &Handle) -> bool {
        let is_child = parent
            .children
            .borrow()
            .iter()
            .any(|existing| Rc::ptr_eq(existing, child));
        if !is_child {
            return false;
        }

        detach_node(child);
        self.record(MutationRecord::child_list(
            parent.clone(),
            vec![],
            vec![child.clone()],
        ));
        true
    }

    /// 修改文本节点内容
    pub fn set_text(&mut self, node: &Handle, value: &str) -> bool {
        if !is_text_node(node) {
            return false;
        }

        write_text(node, value);
        self.record(MutationRecord::character_data(node.clone()));
        true
    }

    /// 修改文档标题，产生与浏览器一致的 `<title>` 子节点替换记录
    pub fn set_title(&mut self, value: &str) -> bool {
        let title = match get_title_element(&self.dom.document) {
            Some(title) => title,
            None => return false,
        };

        let removed: Vec<Handle> = title.children.borrow().iter().cloned().collect();
        write_title(&self.dom.document, value);
        let added: Vec<Handle> = title.children.borrow().iter().cloned().collect();

        self.record(MutationRecord::child_list(title, added, removed));
        true
    }

    /// 把积累的记录投递给各自的观察者
    ///
    /// 每个有待投递记录的观察者收到一个通知。返回投递的通知数量。
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;

        for registration in &mut self.observers {
            if registration.pending.is_empty() {
                continue;
            }

            let records = std::mem::take(&mut registration.pending);
            if registration.sink.notify(Notification::new(records)) {
                delivered += 1;
            }
        }

        delivered
    }

    fn record(&mut self, record: MutationRecord) {
        for registration in &mut self.observers {
            if registration.wants(&record) {
                registration.pending.push(record.clone());
            }
        }
    }
}
