//! 语言检测
//!
//! 声明语言来自 `<html lang>`，首选语言来自异步的 [`LocaleSource`]。
//! 结果用 [`LanguageResolution`] 显式表示，便于测试三种结果。

use std::future::Future;

use thiserror::Error;

use crate::replacement::ReplacementTable;

/// 未声明语言时使用的语言
pub const UNDECLARED_LANGUAGE: &str = "en";

/// 首选语言查询错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// 来源无法提供首选语言
    #[error("首选语言查询失败: {0}")]
    Unavailable(String),

    /// 查询超时
    #[error("首选语言查询超时")]
    TimedOut,
}

/// 用户首选语言来源
pub trait LocaleSource {
    /// 按优先级排列的语言标签
    fn accept_languages(&self) -> impl Future<Output = Result<Vec<String>, LocaleError>>;
}

/// 固定的首选语言列表
#[derive(Debug, Clone)]
pub struct StaticLocales {
    languages: Result<Vec<String>, LocaleError>,
}

impl StaticLocales {
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: Ok(languages.into_iter().map(Into::into).collect()),
        }
    }

    /// 每次查询都失败的来源
    pub fn failing(reason: &str) -> Self {
        Self {
            languages: Err(LocaleError::Unavailable(reason.to_string())),
        }
    }
}

impl LocaleSource for StaticLocales {
    async fn accept_languages(&self) -> Result<Vec<String>, LocaleError> {
        self.languages.clone()
    }
}

/// 操作系统的首选语言
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocales;

impl LocaleSource for SystemLocales {
    async fn accept_languages(&self) -> Result<Vec<String>, LocaleError> {
        Ok(sys_locale::get_locales().collect())
    }
}

/// 语言检测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageResolution {
    /// 已确定激活语言
    Resolved(String),
    /// 声明语言不受支持，不做任何处理
    Unsupported,
    /// 首选语言尚未得到（失败、超时或未完成）
    Pending,
}

/// 规范化声明语言：取前两个字符并转为小写，未声明时为 `en`
pub fn declared_language(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.is_empty() => raw.chars().take(2).collect::<String>().to_lowercase(),
        _ => UNDECLARED_LANGUAGE.to_string(),
    }
}

/// 选择激活语言
///
/// 依次尝试声明语言、第一个首选语言的前两个字符，最后退回替换表的默认语言。
pub fn select_language(declared: &str, preferred: &[String], table: &ReplacementTable) -> String {
    if table.is_supported(declared) {
        return declared.to_string();
    }

    if let Some(first) = preferred.first() {
        let first = declared_language(Some(first.as_str()));
        if table.is_supported(&first) {
            return first;
        }
    }

    table.default_language().to_string()
}

/// 根据声明语言与首选语言得出检测结果
///
/// `preferred` 为 `None` 表示首选语言尚不可用。
pub fn resolve_language(
    declared: &str,
    preferred: Option<&[String]>,
    table: &ReplacementTable,
) -> LanguageResolution {
    if !table.is_supported(declared) {
        return LanguageResolution::Unsupported;
    }

    match preferred {
        Some(preferred) => LanguageResolution::Resolved(select_language(declared, preferred, table)),
        None => LanguageResolution::Pending,
    }
}
