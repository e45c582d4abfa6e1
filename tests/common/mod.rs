// 测试通用工具模块
//
// 提供集成测试共享的替换表、语言来源和文档辅助函数

use std::cell::Cell;
use std::time::Duration;

use markup5ever_rcdom::Handle;
use retext::locale::{LocaleError, LocaleSource, StaticLocales};
use retext::parsers::html::{find_nodes, text_content};
use retext::{DocumentHost, ReplacementTable, RetextOptions, Substituter};

/// 只含一个词条的替换表
pub const TOUGH_YEAR_TABLE: &str = r#"
    supported = ["en"]
    default = "en"

    [languages.en.singular]
    terms = ["2020"]
    replacement = "(a tough year)"

    [languages.en.plural]
    terms = []
    replacement = "(tough years)"
"#;

pub fn tough_year_table() -> ReplacementTable {
    ReplacementTable::from_toml_str(TOUGH_YEAR_TABLE).unwrap()
}

pub fn tough_year_substituter() -> Substituter {
    Substituter::new(&tough_year_table(), "en").unwrap()
}

pub fn builtin_substituter() -> Substituter {
    Substituter::new(&ReplacementTable::builtin().unwrap(), "en").unwrap()
}

/// 短间隔、无超时的运行选项
pub fn options(interval_ms: u64) -> RetextOptions {
    RetextOptions {
        drain_interval: Duration::from_millis(interval_ms),
        locale_timeout: None,
    }
}

/// 从 HTML 文本创建宿主
pub fn host(html: &str) -> DocumentHost {
    DocumentHost::parse(html).unwrap()
}

/// 按标签名查找第一个元素
pub fn element(host: &DocumentHost, path: Vec<&str>) -> Handle {
    find_nodes(host.document(), path).into_iter().next().unwrap()
}

/// body 的全部文本
pub fn body_text(host: &DocumentHost) -> String {
    host.body().map(|body| text_content(&body)).unwrap_or_default()
}

/// 记录调用次数的语言来源
pub struct CountingLocales {
    inner: StaticLocales,
    calls: Cell<usize>,
}

impl CountingLocales {
    pub fn new(languages: &[&str]) -> Self {
        Self {
            inner: StaticLocales::new(languages.iter().copied()),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl LocaleSource for CountingLocales {
    async fn accept_languages(&self) -> Result<Vec<String>, LocaleError> {
        self.calls.set(self.calls.get() + 1);
        self.inner.accept_languages().await
    }
}

/// 永远不会返回的语言来源
pub struct PendingLocales;

impl LocaleSource for PendingLocales {
    async fn accept_languages(&self) -> Result<Vec<String>, LocaleError> {
        std::future::pending().await
    }
}
