//! 候选论文检索
//!
//! 由关键词构建布尔检索式，调用论文源，并把原始条目整理成候选论文：
//! 标题/摘要空白折叠、短标题丢弃、时间窗口过滤、摘要截断、数量上限。

use chrono::{DateTime, Months, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::config::ResearchConfig;
use crate::error::{AppError, Result};
use crate::models::research::{Candidate, KeywordSet, Lookup};
use crate::services::research::text::{collapse_whitespace, truncate_chars};
use crate::sources::{FeedEntry, PaperQuery, PaperSource};

/// 构建检索式
///
/// 主关键词包含空白时追加标题和摘要的短语子句；前 N 个足够长的关键词各追加一个全字段子句。
/// 所有子句以 OR 连接。
pub fn build_search_query(keywords: &KeywordSet, config: &ResearchConfig) -> String {
    let primary = keywords.primary();
    let mut clauses = Vec::new();

    if primary.contains(char::is_whitespace) {
        clauses.push(format!("ti:\"{}\"", primary));
        clauses.push(format!("abs:\"{}\"", primary));
    }

    for keyword in keywords.iter().take(config.search_keyword_count) {
        if keyword.chars().count() > config.min_keyword_len {
            clauses.push(all_fields_clause(keyword));
        }
    }

    if clauses.is_empty() {
        // 主题过短且没有可用关键词时，仍然用主题检索
        clauses.push(all_fields_clause(primary));
    }

    clauses.join(" OR ")
}

fn all_fields_clause(keyword: &str) -> String {
    if keyword.contains(char::is_whitespace) {
        format!("all:\"{}\"", keyword)
    } else {
        format!("all:{}", keyword)
    }
}

/// 时间窗口起点：`now` 往前推 `years` 年
pub fn recency_cutoff(now: DateTime<Utc>, years: u32) -> Result<DateTime<Utc>> {
    now.checked_sub_months(Months::new(years.saturating_mul(12)))
        .ok_or_else(|| AppError::Internal(format!("invalid recency window: {} years", years)))
}

/// 解析发布时间，缺失或无法解析时视为 Unix 纪元
pub fn parse_published(raw: Option<&str>) -> DateTime<Utc> {
    raw.map(str::trim)
        .and_then(|value| {
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(value, "%Y-%m-%d")
                        .ok()
                        .and_then(|date| date.and_hms_opt(0, 0, 0))
                        .map(|dt| dt.and_utc())
                })
        })
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// 把原始条目整理成候选论文
///
/// 按条目顺序处理，收集满 `max_candidates` 个后停止。
pub fn collect_candidates(
    entries: Vec<FeedEntry>,
    cutoff: DateTime<Utc>,
    config: &ResearchConfig,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for entry in entries {
        if candidates.len() >= config.max_candidates {
            break;
        }

        let title = collapse_whitespace(entry.title.as_deref().unwrap_or_default());
        if title.chars().count() < config.min_title_chars {
            debug!(title = %title, "Skipping paper with invalid title");
            continue;
        }

        let published = parse_published(entry.published.as_deref());
        if published < cutoff {
            debug!(title = %title, published = %published.date_naive(), "Skipping paper outside recency window");
            continue;
        }

        let summary = collapse_whitespace(entry.summary.as_deref().unwrap_or_default());
        candidates.push(Candidate {
            title,
            summary: truncate_chars(&summary, config.summary_max_chars),
            published: published.date_naive(),
        });
    }

    candidates
}

/// 候选论文检索
pub struct CandidateSearch {
    source: Arc<dyn PaperSource>,
    config: ResearchConfig,
}

impl CandidateSearch {
    pub fn new(source: Arc<dyn PaperSource>, config: ResearchConfig) -> Self {
        Self { source, config }
    }

    /// 执行检索；数据源不可用时返回 `Unavailable`
    pub async fn search(
        &self,
        keywords: &KeywordSet,
        now: DateTime<Utc>,
    ) -> Result<Lookup<Vec<Candidate>>> {
        let cutoff = recency_cutoff(now, self.config.recency_years)?;
        let query = PaperQuery {
            search_query: build_search_query(keywords, &self.config),
            max_results: self.config.max_results,
        };

        info!(
            search_query = %query.search_query,
            since = %cutoff.date_naive(),
            "Searching recent papers"
        );

        let candidates = match self.source.search(&query).await {
            Lookup::Found(entries) => {
                Lookup::Found(collect_candidates(entries, cutoff, &self.config))
            }
            Lookup::Unavailable => Lookup::Unavailable,
        };

        if let Lookup::Found(found) = &candidates {
            info!(count = found.len(), "Parsed candidate papers");
        }

        Ok(candidates)
    }
}
