//! 外部数据源模块
//!
//! 研究流水线依赖两个只读数据源：百科摘要源和论文检索源。
//! 两者都通过 trait 注入，失败一律表达为 `Lookup::Unavailable`，不会向上抛错。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::config::ResearchConfig;
use crate::error::Result;
use crate::models::research::Lookup;

pub mod arxiv;
pub mod wikipedia;

pub use arxiv::{ArxivClient, parse_atom_feed};
pub use wikipedia::WikipediaSummaryClient;

/// 摘要源：按主题获取一段简短的权威摘要
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// 获取主题摘要；非成功状态、传输错误、超时或缺少 extract 字段时返回 `Unavailable`
    async fn fetch_summary(&self, topic: &str) -> Lookup<String>;
}

/// 论文检索请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperQuery {
    /// 布尔检索式
    pub search_query: String,
    /// 请求的结果数量
    pub max_results: usize,
}

/// 论文源返回的原始条目，字段均可能缺失
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub published: Option<String>,
}

/// 论文源：按检索式返回按提交时间倒序的条目
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// 执行检索；非成功状态、传输错误或超时返回 `Unavailable`
    async fn search(&self, query: &PaperQuery) -> Lookup<Vec<FeedEntry>>;
}

/// 构建带超时的 HTTP 客户端，超时与请求失败同等处理
pub fn build_http_client(config: &ResearchConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

pub fn create_summary_source(config: &ResearchConfig) -> Result<Box<dyn SummarySource>> {
    let client = build_http_client(config)?;
    Ok(Box::new(WikipediaSummaryClient::new(
        client,
        &config.summary_base_url,
    )))
}

pub fn create_paper_source(config: &ResearchConfig) -> Result<Box<dyn PaperSource>> {
    let client = build_http_client(config)?;
    Ok(Box::new(ArxivClient::new(client, &config.paper_base_url)))
}
