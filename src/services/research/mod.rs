//! 研究流水线
//!
//! 主题提取 → 参考摘要 → 关键词 → 候选论文检索 → 相关度过滤 → 回复组装。
//! 流水线不持有跨调用的可变状态，多个查询可以并发执行。

pub mod composer;
pub mod keywords;
pub mod relevance;
pub mod search;
pub mod text;
pub mod topic;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::config::ResearchConfig;
use crate::error::Result;
use crate::models::research::Lookup;
use crate::sources::{PaperSource, SummarySource};

pub use composer::{compose_response, no_information};
pub use keywords::derive_keywords;
pub use relevance::rank_candidates;
pub use search::{CandidateSearch, build_search_query};
pub use topic::extract_topic;

/// 研究代理
pub struct ResearchAgent {
    summaries: Arc<dyn SummarySource>,
    search: CandidateSearch,
    config: ResearchConfig,
}

impl ResearchAgent {
    pub fn new(
        summaries: Arc<dyn SummarySource>,
        papers: Arc<dyn PaperSource>,
        config: ResearchConfig,
    ) -> Self {
        Self {
            summaries,
            search: CandidateSearch::new(papers, config.clone()),
            config,
        }
    }

    /// 处理定义/研究类查询
    pub async fn research(&self, query: &str) -> Result<String> {
        self.research_at(query, Utc::now()).await
    }

    /// 以给定时间为"现在"处理查询
    #[instrument(skip(self, now))]
    pub async fn research_at(&self, query: &str, now: DateTime<Utc>) -> Result<String> {
        let topic = extract_topic(query);
        info!(topic = %topic, "Researching topic");

        let reference_summary = match self.summaries.fetch_summary(topic.as_str()).await {
            Lookup::Found(summary) => summary,
            Lookup::Unavailable => {
                info!(topic = %topic, "No reference summary, skipping paper search");
                return Ok(no_information(&topic));
            }
        };

        let keywords = derive_keywords(&reference_summary, &topic, &self.config);
        let candidates = self.search.search(&keywords, now).await?.unwrap_or_default();
        let ranked = rank_candidates(&topic, candidates, self.config.max_ranked);

        info!(topic = %topic, papers = ranked.len(), "Composing research response");
        Ok(compose_response(
            &topic,
            &reference_summary,
            &ranked,
            self.config.recency_years,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{FeedEntry, MockPaperSource, MockSummarySource};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_missing_summary_short_circuits() {
        let mut summaries = MockSummarySource::new();
        summaries
            .expect_fetch_summary()
            .withf(|topic| topic == "entropy")
            .times(1)
            .returning(|_| Lookup::Unavailable);

        let mut papers = MockPaperSource::new();
        papers.expect_search().times(0);

        let agent = ResearchAgent::new(
            Arc::new(summaries),
            Arc::new(papers),
            ResearchConfig::default(),
        );

        let response = agent.research_at("What is entropy?", now()).await.unwrap();
        assert_eq!(response, "No information found for \"entropy\".");
    }

    #[tokio::test]
    async fn test_entropy_scenario() {
        let mut summaries = MockSummarySource::new();
        summaries.expect_fetch_summary().returning(|_| {
            Lookup::Found("Entropy measures disorder in thermodynamic systems.".to_string())
        });

        let mut papers = MockPaperSource::new();
        papers
            .expect_search()
            .withf(|query| query.search_query.starts_with("all:entropy"))
            .times(1)
            .returning(|_| {
                Lookup::Found(vec![FeedEntry {
                    title: Some("Entropy in Quantum Systems".into()),
                    summary: Some("We relate entropy to entanglement.".into()),
                    published: Some("2025-10-18T00:00:00Z".into()),
                }])
            });

        let agent = ResearchAgent::new(
            Arc::new(summaries),
            Arc::new(papers),
            ResearchConfig::default(),
        );

        let response = agent.research_at("What is entropy?", now()).await.unwrap();
        assert!(response.starts_with("Research Analysis: entropy"));
        assert!(response.contains("Background Overview:\nEntropy measures disorder in thermodynamic systems."));
        assert!(response.contains("1. Entropy in Quantum Systems"));
        assert!(!response.contains("2. "));
        assert!(response.contains("Relevance: 100%"));
    }

    #[tokio::test]
    async fn test_unavailable_paper_source_uses_status_branch() {
        let mut summaries = MockSummarySource::new();
        summaries
            .expect_fetch_summary()
            .returning(|_| Lookup::Found("Pottery is an ancient craft.".to_string()));

        let mut papers = MockPaperSource::new();
        papers.expect_search().returning(|_| Lookup::Unavailable);

        let agent = ResearchAgent::new(
            Arc::new(summaries),
            Arc::new(papers),
            ResearchConfig::default(),
        );

        let response = agent.research_at("describe pottery", now()).await.unwrap();
        assert!(response.contains("Research Status:"));
        assert!(response.contains("Pottery is an ancient craft."));
    }
}
