//! 变更批处理调度器
//!
//! 把突发的 DOM 变更通知与昂贵的重新扫描解耦：空闲时收到的第一个通知立即处理，
//! 之后进入节流状态，通知只排队，每个间隔（默认 250ms）最多处理一次队列。
//!
//! 状态机：
//!
//! - 空闲：收到通知 -> 入队并立即处理 -> 节流，启动计时器
//! - 节流：收到通知 -> 只入队；计时器到期 -> 队列非空则处理并重新计时，否则回到空闲
//!
//! 处理时先整体取出队列再逐个处理，处理期间到达的通知进入新的队列，
//! 既不会丢失也不会被处理两次。

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::core::DEFAULT_DRAIN_INTERVAL;
use crate::observer::Notification;
use crate::parsers::html::{handle_text, is_forbidden, is_text_node, walk};
use crate::replacement::Substituter;

/// 入队结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// 调度器原本空闲，应立即处理并启动计时器
    DrainNow,
    /// 已排队，等待计时器
    Queued,
}

/// 计时器到期后的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// 队列非空：处理并重新计时
    Drain,
    /// 队列为空：回到空闲
    Idle,
}

/// 调度器状态（节流标志 + 通知队列）
#[derive(Debug, Default)]
pub struct SchedulerState {
    throttled: bool,
    queue: VecDeque<Notification>,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_throttled(&self) -> bool {
        self.throttled
    }

    /// 队列中的通知数量
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// 通知入队
    pub fn admit(&mut self, notification: Notification) -> Admission {
        self.queue.push_back(notification);

        if self.throttled {
            Admission::Queued
        } else {
            self.throttled = true;
            Admission::DrainNow
        }
    }

    /// 整体取出当前队列，原队列被清空
    pub fn take_queue(&mut self) -> VecDeque<Notification> {
        std::mem::take(&mut self.queue)
    }

    /// 计时器到期
    pub fn on_timer(&mut self) -> TimerOutcome {
        if self.queue.is_empty() {
            self.throttled = false;
            TimerOutcome::Idle
        } else {
            TimerOutcome::Drain
        }
    }
}

/// 调度器统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// 收到的通知数
    pub notifications: usize,
    /// 处理队列的次数
    pub drains: usize,
    /// 交给替换逻辑的新增节点数
    pub nodes_visited: usize,
    /// 被过滤器拒绝的新增节点数
    pub nodes_skipped: usize,
    /// 内容发生变化的文本节点数
    pub texts_rewritten: usize,
}

/// 统计信息的共享句柄
#[derive(Debug, Clone, Default)]
pub struct StatsHandle(Rc<Cell<SchedulerStats>>);

impl StatsHandle {
    pub fn get(&self) -> SchedulerStats {
        self.0.get()
    }

    fn update(&self, f: impl FnOnce(&mut SchedulerStats)) {
        let mut stats = self.0.get();
        f(&mut stats);
        self.0.set(stats);
    }
}

/// 观察者向调度器投递通知的入口
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    sender: mpsc::UnboundedSender<Notification>,
}

impl SchedulerHandle {
    /// 投递一批变更记录；调度器已停止时返回 `false`
    pub fn notify(&self, notification: Notification) -> bool {
        match self.sender.send(notification) {
            Ok(()) => true,
            Err(_) => {
                tracing::trace!("调度器已停止，丢弃通知");
                false
            }
        }
    }

    /// 调度器是否已停止
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// 变更批处理调度器
///
/// 通过 [`Scheduler::run`] 在单线程运行时中驱动，直到所有 [`SchedulerHandle`] 被释放。
pub struct Scheduler {
    state: SchedulerState,
    substituter: Substituter,
    interval: Duration,
    receiver: mpsc::UnboundedReceiver<Notification>,
    stats: StatsHandle,
}

impl Scheduler {
    pub fn new(substituter: Substituter, interval: Duration) -> (Self, SchedulerHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let scheduler = Self {
            state: SchedulerState::new(),
            substituter,
            interval,
            receiver,
            stats: StatsHandle::default(),
        };

        (scheduler, SchedulerHandle { sender })
    }

    /// 使用默认间隔创建调度器
    pub fn with_default_interval(substituter: Substituter) -> (Self, SchedulerHandle) {
        Self::new(substituter, DEFAULT_DRAIN_INTERVAL)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn substituter(&self) -> &Substituter {
        &self.substituter
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn stats(&self) -> StatsHandle {
        self.stats.clone()
    }

    /// 通知入队，空闲时立即处理
    pub fn admit(&mut self, notification: Notification) -> Admission {
        self.stats.update(|stats| stats.notifications += 1);

        let admission = self.state.admit(notification);
        if admission == Admission::DrainNow {
            self.drain();
        }
        admission
    }

    /// 计时器到期，必要时处理队列
    pub fn on_timer(&mut self) -> TimerOutcome {
        let outcome = self.state.on_timer();
        if outcome == TimerOutcome::Drain {
            self.drain();
        }
        outcome
    }

    /// 运行调度循环
    ///
    /// 节流期间到达的通知留在通道中，计时器到期时一次性收入队列。
    /// 所有句柄释放且队列处理完毕后返回。
    pub async fn run(mut self) {
        tracing::debug!("调度器启动，处理间隔 {:?}", self.interval);

        while let Some(notification) = self.receiver.recv().await {
            self.admit(notification);

            loop {
                tokio::time::sleep(self.interval).await;

                while let Ok(notification) = self.receiver.try_recv() {
                    self.stats.update(|stats| stats.notifications += 1);
                    self.state.admit(notification);
                }

                if self.on_timer() == TimerOutcome::Idle {
                    break;
                }
            }
        }

        tracing::debug!("调度器停止: {:?}", self.stats.get());
    }

    /// 处理当前队列中的全部通知
    ///
    /// 返回处理的通知数量。
    pub fn drain(&mut self) -> usize {
        let queue = self.state.take_queue();
        let count = queue.len();

        for notification in queue {
            self.process(notification);
        }

        self.stats.update(|stats| stats.drains += 1);
        tracing::debug!("处理了 {} 个变更通知", count);
        count
    }

    #[cfg(test)]
    pub(crate) fn receiver_mut(&mut self) -> &mut mpsc::UnboundedReceiver<Notification> {
        &mut self.receiver
    }

    fn process(&self, notification: Notification) {
        for record in notification.records {
            for node in record.added_nodes {
                if is_forbidden(&node) {
                    self.stats.update(|stats| stats.nodes_skipped += 1);
                    continue;
                }

                let rewritten = if is_text_node(&node) {
                    usize::from(handle_text(&node, &self.substituter))
                } else {
                    walk(&node, &self.substituter)
                };

                self.stats.update(|stats| {
                    stats.nodes_visited += 1;
                    stats.texts_rewritten += rewritten;
                });
            }
        }
    }
}
