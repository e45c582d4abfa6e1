//! 启动流程
//!
//! 1. 读取 `<html lang>`，不在支持列表中则完全不处理文档
//! 2. 异步查询用户首选语言并选择激活语言
//! 3. 遍历 body、替换标题
//! 4. 在 body 和 head 上注册观察者，共用同一个调度器

use crate::core::{RetextError, RetextOptions};
use crate::locale::{
    declared_language, resolve_language, LanguageResolution, LocaleError, LocaleSource,
};
use crate::observer::{DocumentHost, ObserverOptions};
use crate::parsers::html::{get_document_language, get_title, set_title, walk};
use crate::replacement::{ReplacementTable, Substituter};
use crate::scheduler::Scheduler;

/// 启动结果
pub enum Bootstrap {
    /// 首次替换已完成，观察者已注册；调用方负责驱动 `scheduler.run()`
    Running {
        language: String,
        scheduler: Scheduler,
    },
    /// 声明语言不受支持，文档未被修改
    Unsupported,
    /// 首选语言查询失败或超时，文档未被修改
    Pending,
}

impl Bootstrap {
    pub fn resolution(&self) -> LanguageResolution {
        match self {
            Bootstrap::Running { language, .. } => LanguageResolution::Resolved(language.clone()),
            Bootstrap::Unsupported => LanguageResolution::Unsupported,
            Bootstrap::Pending => LanguageResolution::Pending,
        }
    }

    pub fn into_scheduler(self) -> Option<Scheduler> {
        match self {
            Bootstrap::Running { scheduler, .. } => Some(scheduler),
            _ => None,
        }
    }
}

/// 对宿主文档执行启动流程
pub async fn bootstrap<L: LocaleSource>(
    host: &mut DocumentHost,
    locale: &L,
    table: &ReplacementTable,
    options: &RetextOptions,
) -> Result<Bootstrap, RetextError> {
    let raw_lang = get_document_language(host.document());
    let declared = declared_language(raw_lang.as_deref());

    if !table.is_supported(&declared) {
        tracing::info!("文档语言 '{}' 不受支持，跳过处理", declared);
        return Ok(Bootstrap::Unsupported);
    }

    let preferred = match query_locales(locale, options).await {
        Ok(preferred) => preferred,
        Err(e) => {
            tracing::debug!("{}，保持文档不变", e);
            return Ok(Bootstrap::Pending);
        }
    };

    let language = match resolve_language(&declared, Some(preferred.as_slice()), table) {
        LanguageResolution::Resolved(language) => language,
        LanguageResolution::Unsupported => return Ok(Bootstrap::Unsupported),
        LanguageResolution::Pending => return Ok(Bootstrap::Pending),
    };
    tracing::info!("激活语言: {} (声明 {}, 首选 {:?})", language, declared, preferred);

    let substituter = Substituter::new(table, &language)?;

    let body = host.body();
    if let Some(body) = &body {
        let rewritten = walk(body, &substituter);
        tracing::debug!("首次遍历替换了 {} 个文本节点", rewritten);
    }

    if let Some(title) = get_title(host.document()) {
        let replaced = substituter.substitute(&title);
        if replaced != title {
            set_title(host.document(), &replaced);
        }
    }

    let (scheduler, handle) = Scheduler::new(substituter, options.drain_interval);
    let observer_options = ObserverOptions::subtree_changes();

    if let Some(body) = &body {
        host.observe(body, observer_options, handle.clone());
    }
    if let Some(head) = host.head() {
        host.observe(&head, observer_options, handle);
    }

    Ok(Bootstrap::Running {
        language,
        scheduler,
    })
}

async fn query_locales<L: LocaleSource>(
    locale: &L,
    options: &RetextOptions,
) -> Result<Vec<String>, LocaleError> {
    match options.locale_timeout {
        Some(limit) => tokio::time::timeout(limit, locale.accept_languages())
            .await
            .unwrap_or(Err(LocaleError::TimedOut)),
        None => locale.accept_languages().await,
    }
}
