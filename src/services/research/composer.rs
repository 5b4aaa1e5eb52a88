//! 回复组装
//!
//! 把主题、参考摘要和排序后的论文拼成一段结构化文本。
//! 章节顺序固定：标题、背景、论文列表 + 综述 + 要点（或"无近期论文"说明）。

use std::fmt::Write;

use crate::models::research::{RankedResults, Topic};

/// 参考摘要缺失时的回复
pub fn no_information(topic: &Topic) -> String {
    format!("No information found for \"{}\".", topic)
}

/// 组装最终回复
pub fn compose_response(
    topic: &Topic,
    reference_summary: &str,
    results: &RankedResults,
    recency_years: u32,
) -> String {
    let mut out = String::new();

    // String 的 fmt::Write 不会失败
    let _ = writeln!(out, "Research Analysis: {}\n", topic);
    let _ = writeln!(out, "📖 Background Overview:\n{}\n", reference_summary);

    if results.is_empty() {
        let _ = write!(
            out,
            "🔍 Research Status:\n\
             While {topic} has a solid foundation of established knowledge, no recent academic papers \
             were found in the arXiv database for the last {recency_years} years that directly match \
             this topic. This could indicate either a mature field with established knowledge or \
             research published in other venues not covered by arXiv."
        );
        return out;
    }

    let _ = writeln!(
        out,
        "🔬 Recent Research Findings (Last {} Years):\n",
        recency_years
    );

    for (index, scored) in results.iter().enumerate() {
        let paper = &scored.candidate;
        let _ = writeln!(out, "{}. {}", index + 1, paper.title);
        let _ = writeln!(
            out,
            "   Published: {} | Relevance: {}%",
            paper.published.format("%Y-%m-%d"),
            scored.relevance_percent()
        );
        let _ = writeln!(out, "   {}\n", paper.summary);
    }

    let _ = writeln!(
        out,
        "📊 Research Synthesis:\n\
         Analysis of {count} highly relevant papers from the last {recency_years} years shows active \
         ongoing research in {topic}. These studies contribute to advancing our understanding through \
         various methodological approaches and findings, indicating this remains an important and \
         evolving field of study.\n",
        count = results.len()
    );

    let _ = write!(
        out,
        "💡 Key Insights:\n\
         The combination of established knowledge from Wikipedia and cutting-edge research from arXiv \
         provides a comprehensive view of {topic}, covering both foundational concepts and the latest \
         academic developments. This dual approach ensures both accessibility for general understanding \
         and depth for advanced research purposes."
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::research::{Candidate, ScoredCandidate};
    use chrono::NaiveDate;

    fn results(count: usize) -> RankedResults {
        RankedResults::from_sorted(
            (0..count)
                .map(|i| ScoredCandidate {
                    candidate: Candidate {
                        title: format!("Entropy Paper {}", i + 1),
                        summary: "About entropy.".to_string(),
                        published: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
                    },
                    relevance_score: 0.5,
                })
                .collect(),
        )
    }

    #[test]
    fn test_no_information_message() {
        assert_eq!(
            no_information(&Topic::new("entropy")),
            "No information found for \"entropy\"."
        );
    }

    #[test]
    fn test_compose_with_papers_keeps_section_order() {
        let topic = Topic::new("entropy");
        let text = compose_response(&topic, "Entropy measures disorder.", &results(2), 6);

        assert!(text.starts_with("Research Analysis: entropy\n"));
        let background = text.find("Background Overview:\nEntropy measures disorder.").unwrap();
        let findings = text.find("Recent Research Findings (Last 6 Years)").unwrap();
        let synthesis = text.find("Analysis of 2 highly relevant papers").unwrap();
        let insights = text.find("Key Insights:").unwrap();
        assert!(background < findings && findings < synthesis && synthesis < insights);

        assert!(text.contains("1. Entropy Paper 1\n   Published: 2025-03-04 | Relevance: 50%\n   About entropy."));
        assert!(text.contains("2. Entropy Paper 2"));
        assert!(!text.contains("Research Status"));
    }

    #[test]
    fn test_compose_without_papers_uses_status_branch() {
        let topic = Topic::new("ancient pottery");
        let text = compose_response(&topic, "Pottery is old.", &RankedResults::default(), 6);

        assert!(text.starts_with("Research Analysis: ancient pottery\n"));
        assert!(text.contains("Background Overview:\nPottery is old."));
        assert!(text.contains("no recent academic papers were found"));
        assert!(text.contains("mature field"));
        assert!(text.contains("other venues"));
        assert!(!text.contains("Recent Research Findings"));
    }
}
