//! 相关度过滤
//!
//! 相关度 = max(主题词命中比例, 包含完整主题短语时为 0.5)。

use tracing::debug;

use crate::models::research::{Candidate, RankedResults, ScoredCandidate, Topic};

/// 参与评分的主题词最小长度（严格大于）
const MIN_TOPIC_WORD_LEN: usize = 3;

/// 完整主题短语命中时的分数
const EXACT_PHRASE_SCORE: f64 = 0.5;

/// 至少命中一个主题词时的接受阈值
const WORD_MATCH_THRESHOLD: f64 = 0.05;

/// 仅凭分数接受的阈值
const SCORE_ONLY_THRESHOLD: f64 = 0.3;

/// 单个候选的评分细节
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceAssessment {
    pub score: f64,
    pub exact_phrase: bool,
    pub any_word_match: bool,
}

impl RelevanceAssessment {
    /// 接受规则：包含完整短语；或命中主题词且分数 > 0.05；或分数 > 0.3
    pub fn is_accepted(&self) -> bool {
        // 按评分公式，最后一个条件只有在前两个成立时才可能成立，保留以维持原有接受规则
        self.exact_phrase
            || (self.any_word_match && self.score > WORD_MATCH_THRESHOLD)
            || self.score > SCORE_ONLY_THRESHOLD
    }
}

/// 主题中长度大于 3 的小写词
pub fn topic_words(topic: &Topic) -> Vec<String> {
    topic
        .as_str()
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_TOPIC_WORD_LEN)
        .map(str::to_string)
        .collect()
}

/// 评估候选文本（已小写）与主题的相关度
pub fn assess(topic: &Topic, text: &str) -> RelevanceAssessment {
    let words = topic_words(topic);
    let matched = words.iter().filter(|word| text.contains(word.as_str())).count();

    let word_score = if words.is_empty() {
        0.0
    } else {
        matched as f64 / words.len() as f64
    };

    let exact_phrase = text.contains(&topic.as_str().to_lowercase());
    let phrase_score = if exact_phrase { EXACT_PHRASE_SCORE } else { 0.0 };

    RelevanceAssessment {
        score: word_score.max(phrase_score),
        exact_phrase,
        any_word_match: matched > 0,
    }
}

fn combined_text(candidate: &Candidate) -> String {
    format!("{} {}", candidate.title, candidate.summary).to_lowercase()
}

/// 评分、过滤并排序候选论文
///
/// 按相关度降序，分数相同保持检索顺序，截断到 `max_ranked` 个。
pub fn rank_candidates(topic: &Topic, candidates: Vec<Candidate>, max_ranked: usize) -> RankedResults {
    let mut accepted: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let assessment = assess(topic, &combined_text(&candidate));
            debug!(
                title = %candidate.title,
                score = assessment.score,
                exact = assessment.exact_phrase,
                word_match = assessment.any_word_match,
                accepted = assessment.is_accepted(),
                "Assessed candidate relevance"
            );

            assessment.is_accepted().then(|| ScoredCandidate {
                candidate,
                relevance_score: assessment.score,
            })
        })
        .collect();

    accepted.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    accepted.truncate(max_ranked);

    RankedResults::from_sorted(accepted)
}
