//! 替换表模块
//!
//! 从内置 TOML 构建 "语言 -> 类别 -> 词条模式" 的只读映射。
//! 所有正则在构建时一次性编译，之后不再修改。

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use thiserror::Error;

/// 内置替换表
pub const BUILTIN_TABLE: &str = include_str!("../../data/replacements.toml");

/// 替换表构建错误
#[derive(Error, Debug)]
pub enum TableError {
    /// TOML 解析错误
    #[error("替换表解析失败: {0}")]
    Parse(#[from] toml::de::Error),

    /// 词条无法编译为正则
    #[error("无效的词条 '{term}': {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },

    /// 空词条
    #[error("语言 '{0}' 中存在空词条")]
    EmptyTerm(String),

    /// 未知类别
    #[error("未知类别 '{0}'，可用值: singular, plural")]
    UnknownCategory(String),

    /// 语言缺少类别
    #[error("语言 '{language}' 缺少类别 {category}")]
    MissingCategory { language: String, category: Category },

    /// 引用了未定义的语言
    #[error("语言 '{0}' 未在替换表中定义")]
    UnknownLanguage(String),
}

pub type TableResult<T> = Result<T, TableError>;

/// 词条类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Singular,
    Plural,
}

impl Category {
    /// 替换时的遍历顺序
    pub const ALL: [Category; 2] = [Category::Singular, Category::Plural];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Singular => "singular",
            Category::Plural => "plural",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "singular" => Ok(Category::Singular),
            "plural" => Ok(Category::Plural),
            other => Err(TableError::UnknownCategory(other.to_string())),
        }
    }
}

/// 替换文本的小写/首字母大写两种形式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementPair {
    /// 原样文本
    pub lower: String,
    /// 首字符大写的文本
    pub capitalized: String,
}

impl ReplacementPair {
    pub fn new(text: &str) -> Self {
        let mut chars = text.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };

        Self {
            lower: text.to_string(),
            capitalized,
        }
    }

    /// 根据匹配到的首字符选择替换形式
    ///
    /// 首字符等于其自身的大写形式时使用大写形式，因此数字和标点
    /// 这类没有大小写的字符也会选中 `capitalized`。
    pub fn select(&self, matched_first: &str) -> &str {
        let is_upper = matched_first
            .chars()
            .next()
            .map_or(false, |c| c.to_uppercase().eq(std::iter::once(c)));

        if is_upper {
            &self.capitalized
        } else {
            &self.lower
        }
    }
}

/// 编译后的词条匹配器
///
/// 模式为 `\b(<首字符>)(<其余部分>)\b`，忽略大小写；`\b` 只按 ASCII 单词字符判断边界。
#[derive(Debug, Clone)]
pub struct Term {
    text: String,
    pattern: Regex,
}

impl Term {
    pub fn new(text: &str) -> TableResult<Self> {
        let mut chars = text.chars();
        let first = chars
            .next()
            .ok_or_else(|| TableError::EmptyTerm(text.to_string()))?;

        let source = format!(
            r"(?-u:\b)({})({})(?-u:\b)",
            regex::escape(&first.to_string()),
            regex::escape(chars.as_str())
        );

        let pattern = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|source| TableError::Pattern {
                term: text.to_string(),
                source,
            })?;

        Ok(Self {
            text: text.to_string(),
            pattern,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// 匹配器加替换文本
#[derive(Debug, Clone)]
pub struct PatternEntry {
    term: Term,
    replacement: ReplacementPair,
}

impl PatternEntry {
    pub fn new(term: Term, replacement: ReplacementPair) -> Self {
        Self { term, replacement }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn pattern(&self) -> &Regex {
        self.term.pattern()
    }

    pub fn replacement(&self) -> &ReplacementPair {
        &self.replacement
    }
}

/// 同一类别下共享一个替换文本的词条组
#[derive(Debug, Clone)]
pub struct TermGroup {
    pub replacement: ReplacementPair,
    pub entries: Vec<PatternEntry>,
}

/// 单个语言的全部类别
#[derive(Debug, Clone)]
pub struct LanguageEntry {
    categories: BTreeMap<Category, TermGroup>,
}

impl LanguageEntry {
    pub fn group(&self, category: Category) -> Option<&TermGroup> {
        self.categories.get(&category)
    }

    /// 按类别顺序迭代
    pub fn groups(&self) -> impl Iterator<Item = (Category, &TermGroup)> {
        self.categories.iter().map(|(category, group)| (*category, group))
    }
}

#[derive(Debug, Deserialize)]
struct RawTable {
    supported: Vec<String>,
    default: String,
    languages: BTreeMap<String, BTreeMap<String, RawGroup>>,
    #[serde(default)]
    all: BTreeMap<String, RawFallbackGroup>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    terms: Vec<String>,
    replacement: String,
}

#[derive(Debug, Deserialize)]
struct RawFallbackGroup {
    terms: Vec<String>,
}

/// 替换表
///
/// 语言按代码升序迭代；`all` 中的词条与语言无关。
#[derive(Debug, Clone)]
pub struct ReplacementTable {
    languages: BTreeMap<String, LanguageEntry>,
    fallback: BTreeMap<Category, Vec<Term>>,
    supported: Vec<String>,
    default_language: String,
}

impl ReplacementTable {
    /// 加载内置替换表
    pub fn builtin() -> TableResult<Self> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    /// 从 TOML 文本构建替换表
    pub fn from_toml_str(source: &str) -> TableResult<Self> {
        let raw: RawTable = toml::from_str(source)?;

        let mut languages = BTreeMap::new();
        for (code, raw_groups) in raw.languages {
            let code = code.to_lowercase();
            let mut categories = BTreeMap::new();

            for (name, raw_group) in raw_groups {
                let category = name.parse::<Category>()?;
                let replacement = ReplacementPair::new(&raw_group.replacement);
                let entries = raw_group
                    .terms
                    .iter()
                    .map(|text| {
                        if text.is_empty() {
                            return Err(TableError::EmptyTerm(code.clone()));
                        }
                        Ok(PatternEntry::new(Term::new(text)?, replacement.clone()))
                    })
                    .collect::<TableResult<Vec<_>>>()?;

                categories.insert(
                    category,
                    TermGroup {
                        replacement,
                        entries,
                    },
                );
            }

            for category in Category::ALL {
                if !categories.contains_key(&category) {
                    return Err(TableError::MissingCategory {
                        language: code,
                        category,
                    });
                }
            }

            languages.insert(code, LanguageEntry { categories });
        }

        let mut fallback = BTreeMap::new();
        for (name, raw_group) in raw.all {
            let category = name.parse::<Category>()?;
            let terms = raw_group
                .terms
                .iter()
                .map(|text| {
                    if text.is_empty() {
                        return Err(TableError::EmptyTerm("all".to_string()));
                    }
                    Term::new(text)
                })
                .collect::<TableResult<Vec<_>>>()?;
            fallback.insert(category, terms);
        }

        let supported: Vec<String> = raw.supported.iter().map(|s| s.to_lowercase()).collect();
        for code in &supported {
            if !languages.contains_key(code) {
                return Err(TableError::UnknownLanguage(code.clone()));
            }
        }

        let default_language = raw.default.to_lowercase();
        if !languages.contains_key(&default_language) {
            return Err(TableError::UnknownLanguage(default_language));
        }

        Ok(Self {
            languages,
            fallback,
            supported,
            default_language,
        })
    }

    pub fn language(&self, code: &str) -> Option<&LanguageEntry> {
        self.languages.get(code)
    }

    pub fn languages(&self) -> impl Iterator<Item = (&str, &LanguageEntry)> {
        self.languages
            .iter()
            .map(|(code, entry)| (code.as_str(), entry))
    }

    /// 与语言无关的词条
    pub fn fallback_terms(&self, category: Category) -> &[Term] {
        self.fallback
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.iter().any(|s| s == code)
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }
}
