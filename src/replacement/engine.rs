//! 文本替换引擎
//!
//! 按 "语言 -> 类别 -> 词条" 的顺序依次应用替换表中的全部模式，
//! 最后应用与语言无关的词条组。

use std::borrow::Cow;

use regex::Captures;

use super::table::{Category, PatternEntry, ReplacementTable, TableError, TableResult};

/// 针对某个激活语言预先展开的替换序列
#[derive(Debug, Clone)]
pub struct Substituter {
    language: String,
    passes: Vec<PatternEntry>,
}

impl Substituter {
    /// 为激活语言构建替换器
    ///
    /// 与语言无关的词条使用激活语言同类别的替换文本。
    pub fn new(table: &ReplacementTable, language: &str) -> TableResult<Self> {
        let active = table
            .language(language)
            .ok_or_else(|| TableError::UnknownLanguage(language.to_string()))?;

        let mut passes = Vec::new();
        for (_, entry) in table.languages() {
            for (_, group) in entry.groups() {
                passes.extend(group.entries.iter().cloned());
            }
        }

        for category in Category::ALL {
            let replacement = match active.group(category) {
                Some(group) => &group.replacement,
                None => continue,
            };
            for term in table.fallback_terms(category) {
                passes.push(PatternEntry::new(term.clone(), replacement.clone()));
            }
        }

        tracing::debug!("替换器已就绪: 语言 {}，共 {} 个模式", language, passes.len());

        Ok(Self {
            language: language.to_string(),
            passes,
        })
    }

    /// 激活语言
    pub fn language(&self) -> &str {
        &self.language
    }

    /// 展开后的模式数量
    pub fn pattern_count(&self) -> usize {
        self.passes.len()
    }

    /// 替换文本中所有匹配的词条
    ///
    /// 每个模式作用于前一个模式的结果；没有匹配时返回原文。
    pub fn substitute(&self, text: &str) -> String {
        let mut value = Cow::Borrowed(text);

        for entry in &self.passes {
            let replaced = match entry.pattern().replace_all(&value, |caps: &Captures<'_>| {
                entry.replacement().select(&caps[1]).to_string()
            }) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };

            if let Some(replaced) = replaced {
                value = Cow::Owned(replaced);
            }
        }

        value.into_owned()
    }
}
