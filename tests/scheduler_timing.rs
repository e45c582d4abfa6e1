//! 调度器时序集成测试
//!
//! 使用暂停的 tokio 时钟驱动观察者和调度器，验证节流、合并与不丢失通知

use std::time::Duration;

use markup5ever_rcdom::Handle;
use retext::parsers::html::{create_element, create_text_node, set_node_attr, text_content};
use retext::{ObserverOptions, Scheduler};
use tokio::time::sleep;

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{element, host, tough_year_substituter};

const INTERVAL: Duration = Duration::from_millis(250);

#[tokio::test(start_paused = true)]
async fn test_burst_is_coalesced_without_loss() {
    let mut host = host("<html><body><div id=\"feed\"></div></body></html>");
    let (scheduler, handle) = Scheduler::new(tough_year_substituter(), INTERVAL);
    let stats = scheduler.stats();

    let body = host.body().unwrap();
    host.observe(&body, ObserverOptions::subtree_changes(), handle);
    let feed = element(&host, vec!["div"]);

    let driver = async move {
        // 空闲时的第一个通知立即处理
        let first = create_text_node("2020 #0");
        host.append_child(&feed, first.clone());
        host.flush();
        sleep(Duration::from_millis(1)).await;

        assert_eq!(stats.get().drains, 1);
        assert_eq!(text_content(&first), "(a tough year) #0");

        // 节流期间的突发变更只排队
        let mut burst: Vec<Handle> = Vec::new();
        for i in 1..10 {
            let node = create_text_node(&format!("2020 #{}", i));
            host.append_child(&feed, node.clone());
            host.flush();
            burst.push(node);
            sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(stats.get().drains, 1);
        assert!(burst.iter().all(|node| text_content(node).starts_with("2020")));

        // 计时器到期后一次处理全部排队通知
        sleep(Duration::from_millis(200)).await;
        let after_burst = stats.get();
        assert_eq!(after_burst.drains, 2);
        assert_eq!(after_burst.notifications, 10);
        assert_eq!(after_burst.nodes_visited, 10);
        assert_eq!(after_burst.texts_rewritten, 10);
        for (i, node) in burst.iter().enumerate() {
            assert_eq!(text_content(node), format!("(a tough year) #{}", i + 1));
        }

        // 下一个计时器发现队列为空，回到空闲
        sleep(Duration::from_millis(300)).await;
        assert_eq!(stats.get().drains, 2);

        let late = create_text_node("late 2020");
        host.append_child(&feed, late.clone());
        host.flush();
        sleep(Duration::from_millis(1)).await;

        assert_eq!(stats.get().drains, 3);
        assert_eq!(text_content(&late), "late (a tough year)");

        // 释放宿主即释放全部句柄，调度循环随之结束
        drop(host);
    };

    tokio::join!(scheduler.run(), driver);
}

#[tokio::test(start_paused = true)]
async fn test_forbidden_nodes_are_skipped() {
    let mut host =
        host("<html><body><div contenteditable=\"true\"></div><main></main></body></html>");
    let (scheduler, handle) = Scheduler::new(tough_year_substituter(), INTERVAL);
    let stats = scheduler.stats();

    let body = host.body().unwrap();
    host.observe(&body, ObserverOptions::subtree_changes(), handle);
    let editable = element(&host, vec!["div"]);
    let main = element(&host, vec!["main"]);

    let driver = async move {
        let textarea = create_element(host.dom(), "textarea");
        host.append_child(&textarea, create_text_node("draft about 2020"));
        let typed = create_text_node("typing 2020");
        let paragraph = create_element(host.dom(), "p");
        host.append_child(&paragraph, create_text_node("news from 2020"));
        let frozen = create_element(host.dom(), "section");
        set_node_attr(&frozen, "contenteditable", Some("false".to_string()));
        host.append_child(&frozen, create_text_node("still 2020"));

        host.append_child(&main, textarea.clone());
        host.append_child(&editable, typed.clone());
        host.append_child(&main, paragraph.clone());
        host.append_child(&editable, frozen.clone());
        host.flush();
        sleep(Duration::from_millis(1)).await;

        let stats = stats.get();
        assert_eq!(stats.drains, 1);
        assert_eq!(stats.nodes_skipped, 3);
        assert_eq!(stats.nodes_visited, 1);

        assert_eq!(text_content(&textarea), "draft about 2020");
        assert_eq!(text_content(&typed), "typing 2020");
        assert_eq!(text_content(&paragraph), "news from (a tough year)");
        // 父节点可编辑，即使自身声明了 contenteditable="false"
        assert_eq!(text_content(&frozen), "still 2020");

        drop(host);
    };

    tokio::join!(scheduler.run(), driver);
}

#[tokio::test(start_paused = true)]
async fn test_character_data_changes_are_not_rescanned() {
    let mut host = host("<html><body><p>plain</p></body></html>");
    let (scheduler, handle) = Scheduler::new(tough_year_substituter(), INTERVAL);
    let stats = scheduler.stats();

    let body = host.body().unwrap();
    host.observe(&body, ObserverOptions::subtree_changes(), handle);
    let text = element(&host, vec!["p"]).children.borrow()[0].clone();

    let driver = async move {
        assert!(host.set_text(&text, "edited in 2020"));
        assert_eq!(host.flush(), 1);
        sleep(Duration::from_millis(1)).await;

        let stats = stats.get();
        assert_eq!(stats.notifications, 1);
        assert_eq!(stats.nodes_visited, 0);
        assert_eq!(text_content(&text), "edited in 2020");

        drop(host);
    };

    tokio::join!(scheduler.run(), driver);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_stops_when_handles_are_dropped() {
    let (scheduler, handle) = Scheduler::new(tough_year_substituter(), INTERVAL);
    let stats = scheduler.stats();
    drop(handle);

    scheduler.run().await;
    assert_eq!(stats.get().drains, 0);
}
