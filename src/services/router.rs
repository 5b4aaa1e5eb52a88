//! 查询分类与分发
//!
//! 有序规则表，第一个命中的规则决定回复策略；只有研究策略会访问外部数据源。
//! `QueryRouter::process_query` 是核心对外的唯一入口，永远返回格式良好的响应。

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::Result;
use crate::models::message::AgentResponse;
use crate::observability::AppMetrics;
use crate::services::research::{ResearchAgent, extract_topic};
use crate::services::templates;

/// 内部失败时的道歉回复
pub const APOLOGY: &str = "I'm sorry, I encountered an error while processing your request. Please try rephrasing your question.";

/// 回复策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// 定义/研究（完整流水线）
    Research,
    /// 操作指南模板
    HowTo,
    /// 新闻模板
    News,
    /// 历史模板
    History,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Research => "research",
            Strategy::HowTo => "how_to",
            Strategy::News => "news",
            Strategy::History => "history",
        }
    }

    /// 是否会访问外部数据源
    pub fn uses_pipeline(&self) -> bool {
        matches!(self, Strategy::Research)
    }
}

/// 匹配方式（均不区分大小写）
enum Matcher {
    StartsWith(&'static [&'static str]),
    Contains(&'static [&'static str]),
}

impl Matcher {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            Matcher::StartsWith(prefixes) => prefixes.iter().any(|p| lowered.starts_with(p)),
            Matcher::Contains(needles) => needles.iter().any(|n| lowered.contains(n)),
        }
    }
}

struct Route {
    matcher: Matcher,
    strategy: Strategy,
}

/// 路由规则，按顺序匹配；前缀规则在包含规则之前
const ROUTES: &[Route] = &[
    Route {
        matcher: Matcher::StartsWith(&[
            "what is",
            "define",
            "explain",
            "describe",
            "summarize",
            "summary",
            "who is",
            "who are",
            "tell me about",
        ]),
        strategy: Strategy::Research,
    },
    Route {
        matcher: Matcher::StartsWith(&["how to", "how do"]),
        strategy: Strategy::HowTo,
    },
    Route {
        matcher: Matcher::Contains(&["news", "current events"]),
        strategy: Strategy::News,
    },
    Route {
        matcher: Matcher::Contains(&["history", "historical"]),
        strategy: Strategy::History,
    },
];

/// 对原始查询分类，未命中任何规则时走研究策略
pub fn classify(query: &str) -> Strategy {
    let lowered = query.to_lowercase();
    ROUTES
        .iter()
        .find(|route| route.matcher.matches(&lowered))
        .map(|route| route.strategy)
        .unwrap_or(Strategy::Research)
}

/// 查询分发器
pub struct QueryRouter {
    agent: ResearchAgent,
    metrics: Arc<AppMetrics>,
}

impl QueryRouter {
    pub fn new(agent: ResearchAgent, metrics: Arc<AppMetrics>) -> Self {
        Self { agent, metrics }
    }

    /// 处理一条原始查询
    ///
    /// 内部错误和 panic 都在这里被拦截，转成 agent = system、confidence = low 的道歉回复。
    pub async fn process_query(&self, raw: &str) -> AgentResponse {
        let strategy = classify(raw);
        self.metrics.record_query(strategy);
        info!(strategy = strategy.as_str(), "Dispatching query");

        let outcome = AssertUnwindSafe(self.dispatch(strategy, raw))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(content)) => AgentResponse::research(content),
            Ok(Err(e)) => {
                error!(error = %e, "Error processing query with research agent");
                self.metrics.record_fallback();
                AgentResponse::system(APOLOGY)
            }
            Err(_) => {
                error!("Research agent panicked while processing query");
                self.metrics.record_fallback();
                AgentResponse::system(APOLOGY)
            }
        }
    }

    async fn dispatch(&self, strategy: Strategy, raw: &str) -> Result<String> {
        match strategy {
            Strategy::Research => self.agent.research(raw).await,
            Strategy::HowTo => Ok(templates::how_to(&extract_topic(raw))),
            Strategy::News => Ok(templates::news()),
            Strategy::History => Ok(templates::history(&extract_topic(raw))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::ResearchConfig;
    use crate::models::message::{AgentKind, Confidence};
    use crate::models::research::Lookup;
    use crate::sources::{MockPaperSource, MockSummarySource};
    use rstest::rstest;

    #[rstest]
    #[case("What is entropy?", Strategy::Research)]
    #[case("Define recursion", Strategy::Research)]
    #[case("summary of the news today", Strategy::Research)]
    #[case("tell me about historical linguistics", Strategy::Research)]
    #[case("How to bake bread", Strategy::HowTo)]
    #[case("how do I learn the history of Rome", Strategy::HowTo)]
    #[case("latest NEWS on fusion", Strategy::News)]
    #[case("current events in science", Strategy::News)]
    #[case("the history of jazz", Strategy::History)]
    #[case("historical climate data", Strategy::History)]
    #[case("quantum computing", Strategy::Research)]
    #[case("", Strategy::Research)]
    fn test_classify(#[case] query: &str, #[case] expected: Strategy) {
        assert_eq!(classify(query), expected);
    }

    fn offline_router() -> QueryRouter {
        let mut summaries = MockSummarySource::new();
        summaries.expect_fetch_summary().times(0);
        let mut papers = MockPaperSource::new();
        papers.expect_search().times(0);

        let agent = ResearchAgent::new(
            Arc::new(summaries),
            Arc::new(papers),
            ResearchConfig::default(),
        );
        QueryRouter::new(agent, Arc::new(AppMetrics::default()))
    }

    #[rstest]
    #[case("How to bake bread")]
    #[case("What's in the news?")]
    #[case("A brief history of time")]
    #[tokio::test]
    async fn test_template_paths_never_touch_sources(#[case] query: &str) {
        let router = offline_router();
        let response = router.process_query(query).await;

        assert_eq!(response.agent, AgentKind::Research);
        assert_eq!(response.confidence, Confidence::High);
    }

    #[tokio::test]
    async fn test_how_to_template_content() {
        let response = offline_router().process_query("How to bake bread").await;
        assert_eq!(response.content, templates::how_to(&extract_topic("bake bread")));
    }

    #[tokio::test]
    async fn test_research_path_uses_pipeline() {
        let mut summaries = MockSummarySource::new();
        summaries
            .expect_fetch_summary()
            .times(1)
            .returning(|_| Lookup::Unavailable);
        let mut papers = MockPaperSource::new();
        papers.expect_search().times(0);

        let metrics = Arc::new(AppMetrics::default());
        let router = QueryRouter::new(
            ResearchAgent::new(Arc::new(summaries), Arc::new(papers), ResearchConfig::default()),
            metrics.clone(),
        );

        let response = router.process_query("explain gravity").await;
        assert_eq!(response.content, "No information found for \"gravity\".");
        assert_eq!(response.agent, AgentKind::Research);
        assert!(metrics.gather().contains("research_queries_total 1"));
    }

    #[tokio::test]
    async fn test_internal_failure_becomes_system_response() {
        let mut summaries = MockSummarySource::new();
        summaries
            .expect_fetch_summary()
            .returning(|_| Lookup::Found("Gravity attracts masses together.".to_string()));
        let mut papers = MockPaperSource::new();
        papers.expect_search().times(0);

        // 无法计算的时间窗口会在流水线内部产生错误
        let config = ResearchConfig {
            recency_years: u32::MAX,
            ..ResearchConfig::default()
        };
        let metrics = Arc::new(AppMetrics::default());
        let router = QueryRouter::new(
            ResearchAgent::new(Arc::new(summaries), Arc::new(papers), config),
            metrics.clone(),
        );

        let response = router.process_query("what is gravity").await;
        assert_eq!(response.agent, AgentKind::System);
        assert_eq!(response.confidence, Confidence::Low);
        assert_eq!(response.content, APOLOGY);
        assert!(metrics.gather().contains("system_fallbacks_total 1"));
    }

    struct ExplodingSource;

    #[async_trait::async_trait]
    impl crate::sources::SummarySource for ExplodingSource {
        async fn fetch_summary(&self, _topic: &str) -> Lookup<String> {
            panic!("summary source exploded")
        }
    }

    #[tokio::test]
    async fn test_panic_in_source_becomes_system_response() {
        let mut papers = MockPaperSource::new();
        papers.expect_search().times(0);

        let router = QueryRouter::new(
            ResearchAgent::new(Arc::new(ExplodingSource), Arc::new(papers), ResearchConfig::default()),
            Arc::new(AppMetrics::default()),
        );

        let response = router.process_query("what is gravity").await;
        assert_eq!(response.agent, AgentKind::System);
        assert_eq!(response.content, APOLOGY);
    }
}
