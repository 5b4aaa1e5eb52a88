//! 主题提取

use crate::models::research::Topic;

/// 提取主题时去掉的疑问式前缀
pub const QUESTION_PREFIXES: &[&str] = &[
    "what is",
    "what are",
    "how to",
    "how do",
    "explain",
    "describe",
    "tell me about",
    "summarize",
    "define",
    "who is",
    "who are",
];

/// 从原始查询中提取主题
///
/// 前缀只在原始查询开头匹配（不区分大小写），连同其后的空白一起去掉；
/// 问号只在它是最后一个字符时去掉一个；最后修剪空白。
/// 与 `classify` 一样不预先修剪，结果为空时回退为占位主题。
pub fn extract_topic(query: &str) -> Topic {
    let rest = QUESTION_PREFIXES
        .iter()
        .find_map(|prefix| strip_prefix_ignore_case(query, prefix))
        .unwrap_or(query);

    let rest = rest.strip_suffix('?').unwrap_or(rest);

    Topic::new(rest)
}

pub(crate) fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| text[prefix.len()..].trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::research::TOPIC_PLACEHOLDER;
    use rstest::rstest;

    #[rstest]
    #[case("What is entropy?", "entropy")]
    #[case("what are black holes", "black holes")]
    #[case("How to bake bread", "bake bread")]
    #[case("how do vaccines work?", "vaccines work")]
    #[case("EXPLAIN   quantum tunneling", "quantum tunneling")]
    #[case("Tell me about the Roman Empire?", "the Roman Empire")]
    #[case("define recursion", "recursion")]
    #[case("Who is Ada Lovelace?", "Ada Lovelace")]
    #[case("quantum computing", "quantum computing")]
    #[case("  photosynthesis?  ", "photosynthesis?")]
    #[case("what is entropy? ", "entropy?")]
    #[case("  how to bake bread", "how to bake bread")]
    fn test_extract_topic(#[case] query: &str, #[case] expected: &str) {
        assert_eq!(extract_topic(query).as_str(), expected);
    }

    #[rstest]
    #[case("What is?")]
    #[case("explain")]
    #[case("   ")]
    fn test_extract_topic_falls_back_to_placeholder(#[case] query: &str) {
        assert_eq!(extract_topic(query).as_str(), TOPIC_PLACEHOLDER);
    }

    #[test]
    fn test_extract_topic_is_idempotent_on_clean_topics() {
        let once = extract_topic("quantum computing");
        let twice = extract_topic(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_leading_whitespace_blocks_prefix_like_classifier() {
        let query = "  how to bake bread";
        assert_eq!(
            crate::services::router::classify(query),
            crate::services::router::Strategy::Research
        );
        assert_eq!(extract_topic(query).as_str(), "how to bake bread");
    }

    #[test]
    fn test_only_one_trailing_question_mark_is_removed() {
        assert_eq!(extract_topic("what is this??").as_str(), "this?");
    }

    #[test]
    fn test_non_ascii_query_does_not_panic() {
        assert_eq!(extract_topic("é").as_str(), "é");
        assert_eq!(extract_topic("définir entropie").as_str(), "définir entropie");
    }
}
