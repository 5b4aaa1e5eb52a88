//! 研究流水线数据模型
//!
//! 所有实体都只存在于单次查询处理过程中，核心流水线本身不做任何持久化。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 主题提取结果为空时使用的占位主题
pub const TOPIC_PLACEHOLDER: &str = "this topic";

/// 研究主题
///
/// 去掉疑问式前后缀后的查询主体，保证非空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Topic(String);

impl Topic {
    /// 创建主题，空白字符串回退为占位主题
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self(TOPIC_PLACEHOLDER.to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 有序关键词列表
///
/// 第一个元素永远是主题本身，其后是按词频排序的摘要关键词；
/// 不区分大小写去重，长度不超过构造时给定的上限。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// 以主题开头构造关键词列表，`max_len` 至少为 1
    pub fn new<I>(topic: &Topic, terms: I, max_len: usize) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let max_len = max_len.max(1);
        let mut keywords = vec![topic.as_str().to_string()];

        for term in terms {
            if keywords.len() >= max_len {
                break;
            }
            if keywords.iter().any(|k| k.eq_ignore_ascii_case(&term)) {
                continue;
            }
            keywords.push(term);
        }

        Self { keywords }
    }

    /// 主关键词（即主题）
    pub fn primary(&self) -> &str {
        &self.keywords[0]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.keywords
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// 关键词列表至少包含主题，因此永远不为空
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// 候选论文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// 规范化后的标题
    pub title: String,
    /// 规范化并截断后的摘要
    pub summary: String,
    /// 发布日期
    pub published: NaiveDate,
}

/// 带相关度的候选论文
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    /// 相关度，取值 [0, 1]
    pub relevance_score: f64,
}

impl ScoredCandidate {
    /// 相关度百分比（四舍五入）
    pub fn relevance_percent(&self) -> u32 {
        (self.relevance_score * 100.0).round() as u32
    }
}

/// 排序后的最终结果
///
/// 只能由相关度过滤器构造：按相关度降序、相同分数保持检索顺序、已截断。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedResults(Vec<ScoredCandidate>);

impl RankedResults {
    pub(crate) fn from_sorted(results: Vec<ScoredCandidate>) -> Self {
        Self(results)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredCandidate> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a RankedResults {
    type Item = &'a ScoredCandidate;
    type IntoIter = std::slice::Iter<'a, ScoredCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// 外部查找结果
///
/// 显式区分"拿到了结果（可能为空）"和"数据源不可用"，
/// 避免"没有摘要"与"有摘要但没有论文"两种情况混淆。
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// 数据源返回了可用数据
    Found(T),
    /// 非成功状态、传输错误、超时或缺少字段
    Unavailable,
}

impl<T: Default> Lookup<T> {
    /// 不可用时回退为默认值（如空列表）
    pub fn unwrap_or_default(self) -> T {
        match self {
            Lookup::Found(value) => value,
            Lookup::Unavailable => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_falls_back_to_placeholder() {
        assert_eq!(Topic::new("   ").as_str(), TOPIC_PLACEHOLDER);
        assert_eq!(Topic::new("").as_str(), TOPIC_PLACEHOLDER);
        assert_eq!(Topic::new(" entropy ").as_str(), "entropy");
    }

    #[test]
    fn test_keyword_set_starts_with_topic_and_dedups() {
        let topic = Topic::new("Entropy");
        let set = KeywordSet::new(
            &topic,
            vec![
                "entropy".to_string(),
                "disorder".to_string(),
                "DISORDER".to_string(),
                "systems".to_string(),
            ],
            5,
        );

        assert_eq!(set.primary(), "Entropy");
        assert_eq!(set.as_slice(), &["Entropy", "disorder", "systems"]);
    }

    #[test]
    fn test_keyword_set_respects_cap() {
        let topic = Topic::new("graph theory");
        let terms = ["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"]
            .iter()
            .map(|s| s.to_string());
        let set = KeywordSet::new(&topic, terms, 5);

        assert_eq!(set.len(), 5);
        assert_eq!(set.primary(), "graph theory");

        let only_topic = KeywordSet::new(&topic, vec!["alpha".to_string()], 0);
        assert_eq!(only_topic.len(), 1);
    }

    #[test]
    fn test_unavailable_lookup_defaults_to_empty() {
        assert_eq!(Lookup::Found(vec![1u8]).unwrap_or_default(), vec![1]);
        assert!(Lookup::<Vec<u8>>::Unavailable.unwrap_or_default().is_empty());
    }
}
