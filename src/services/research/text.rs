//! 文本规范化
//!
//! 分词、去停用词、大小写与标点处理，供关键词提取和相关度评分使用。

use once_cell::sync::Lazy;
use regex::Regex;

/// 常见英文功能词和助动词
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are",
    "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "must", "can", "cannot", "a", "an", "this", "that",
    "these", "those", "from", "into", "through", "during", "before", "after", "above", "below",
    "between", "among", "also", "such", "other", "used", "using", "use",
];

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// 小写化、标点替换为空格后按空白切分
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// 长度大于 `min_len` 且不是停用词的词元
pub fn content_tokens(text: &str, min_len: usize) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| token.chars().count() > min_len && !is_stop_word(token))
        .collect()
}

/// 把换行和连续空白折叠成单个空格并去掉首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 超过 `max_chars` 个字符时截断并追加省略号
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
