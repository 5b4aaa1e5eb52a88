//! 关键词提取
//!
//! 主题 + 参考摘要中词频最高的若干词，组成后续检索使用的有序关键词列表。

use tracing::debug;

use crate::config::config::ResearchConfig;
use crate::models::research::{KeywordSet, Topic};
use crate::services::research::text::content_tokens;

/// 按词频选出摘要中的前 `limit` 个词
///
/// 词频统计在去重之前完成；词频相同时按首次出现的顺序。
/// 与主题本身相同的词不参与排名。
pub fn top_terms(summary: &str, topic: &Topic, min_len: usize, limit: usize) -> Vec<String> {
    let topic_lower = topic.as_str().to_lowercase();
    let mut frequencies: Vec<(String, usize)> = Vec::new();

    for token in content_tokens(summary, min_len) {
        if token == topic_lower {
            continue;
        }
        match frequencies.iter_mut().find(|(term, _)| *term == token) {
            Some((_, count)) => *count += 1,
            None => frequencies.push((token, 1)),
        }
    }

    // 稳定排序，词频相同保持首次出现顺序
    frequencies.sort_by(|a, b| b.1.cmp(&a.1));
    frequencies
        .into_iter()
        .take(limit)
        .map(|(term, _)| term)
        .collect()
}

/// 从参考摘要派生关键词列表
pub fn derive_keywords(summary: &str, topic: &Topic, config: &ResearchConfig) -> KeywordSet {
    let terms = top_terms(summary, topic, config.min_keyword_len, config.top_keywords);
    let keywords = KeywordSet::new(topic, terms, config.max_keywords);

    debug!(keywords = ?keywords.as_slice(), "Derived keywords");
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResearchConfig {
        ResearchConfig::default()
    }

    #[test]
    fn test_derive_keywords_starts_with_topic() {
        let topic = Topic::new("entropy");
        let keywords = derive_keywords(
            "Entropy measures disorder in thermodynamic systems.",
            &topic,
            &config(),
        );

        assert_eq!(keywords.primary(), "entropy");
        assert_eq!(
            keywords.as_slice(),
            &["entropy", "measures", "disorder", "thermodynamic"]
        );
    }

    #[test]
    fn test_frequency_is_counted_before_dedup() {
        let topic = Topic::new("graphs");
        let summary = "Alpha vertex theory. Vertex edges vertex. Edges matter, edges connect vertex.";
        let terms = top_terms(summary, &topic, 4, 3);

        // vertex x4, edges x3, alpha/theory/matter/connect x1
        assert_eq!(terms, vec!["vertex", "edges", "alpha"]);
    }

    #[test]
    fn test_relative_pronouns_are_ranked_like_other_words() {
        let topic = Topic::new("pottery");
        let terms = top_terms(
            "Pottery, which is clay, which is fired, which cools.",
            &topic,
            4,
            3,
        );
        assert_eq!(terms, vec!["which", "fired", "cools"]);
    }

    #[test]
    fn test_ties_keep_first_appearance_order() {
        let topic = Topic::new("x");
        let terms = top_terms("zebra apple mango apple zebra mango", &topic, 4, 3);
        assert_eq!(terms, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_keywords_never_exceed_cap() {
        let topic = Topic::new("neural networks");
        let mut cfg = config();
        cfg.top_keywords = 10;
        let summary = "perceptron backpropagation gradient descent activation function layers \
                       convolution recurrent transformer attention";
        let keywords = derive_keywords(summary, &topic, &cfg);

        assert_eq!(keywords.len(), 5);
        assert_eq!(keywords.primary(), "neural networks");
    }

    #[test]
    fn test_topic_word_is_not_repeated() {
        let topic = Topic::new("Entropy");
        let keywords = derive_keywords("entropy entropy entropy disorder", &topic, &config());
        assert_eq!(keywords.as_slice(), &["Entropy", "disorder"]);
    }

    #[test]
    fn test_empty_summary_yields_only_topic() {
        let topic = Topic::new("entropy");
        let keywords = derive_keywords("", &topic, &config());
        assert_eq!(keywords.as_slice(), &["entropy"]);
    }
}
