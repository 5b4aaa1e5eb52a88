//! arXiv 论文检索客户端
//!
//! 请求 `export.arxiv.org/api/query`，把 Atom feed 解析成原始条目。
//! 条目的规范化、时间窗口过滤和截断在 `services::research::search` 中完成。

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::research::Lookup;
use crate::sources::{FeedEntry, PaperQuery, PaperSource};

/// arXiv Atom API 客户端
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    async fn request(&self, query: &PaperQuery) -> Result<String> {
        let max_results = query.max_results.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", query.search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "paper source returned {}",
                status
            )));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn search(&self, query: &PaperQuery) -> Lookup<Vec<FeedEntry>> {
        debug!(search_query = %query.search_query, max_results = query.max_results, "Searching papers");

        match self.request(query).await {
            Ok(body) => {
                let entries = parse_atom_feed(&body);
                info!(bytes = body.len(), entries = entries.len(), "Paper feed received");
                Lookup::Found(entries)
            }
            Err(e) => {
                warn!(error = %e, "Paper search failed");
                Lookup::Unavailable
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Title,
    Summary,
    Published,
}

/// Atom feed 解析状态
#[derive(Default)]
struct FeedParser {
    entries: Vec<FeedEntry>,
    current: Option<FeedEntry>,
    field: Option<Field>,
}

impl FeedParser {
    fn handle_start(&mut self, name: &[u8]) {
        match name {
            b"entry" => {
                self.current = Some(FeedEntry::default());
                self.field = None;
            }
            _ if self.current.is_some() => {
                self.field = match name {
                    b"title" => Some(Field::Title),
                    b"summary" => Some(Field::Summary),
                    b"published" => Some(Field::Published),
                    _ => None,
                };
                if let (Some(field), Some(entry)) = (self.field, self.current.as_mut()) {
                    // 标签存在但内容为空时记为空字符串
                    slot(entry, field).get_or_insert_with(String::new);
                }
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if let (Some(field), Some(entry)) = (self.field, self.current.as_mut()) {
            slot(entry, field)
                .get_or_insert_with(String::new)
                .push_str(text);
        }
    }

    fn handle_end(&mut self, name: &[u8]) {
        if name == b"entry" {
            if let Some(entry) = self.current.take() {
                self.entries.push(entry);
            }
        }
        self.field = None;
    }
}

fn slot(entry: &mut FeedEntry, field: Field) -> &mut Option<String> {
    match field {
        Field::Title => &mut entry.title,
        Field::Summary => &mut entry.summary,
        Field::Published => &mut entry.published,
    }
}

/// 解析 Atom feed
///
/// 遇到格式错误时停止解析并保留已完成的条目。
pub fn parse_atom_feed(xml: &str) -> Vec<FeedEntry> {
    let mut reader = Reader::from_str(xml);
    let mut parser = FeedParser::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => parser.handle_start(e.local_name().as_ref()),
            Ok(Event::Text(ref e)) => match e.unescape() {
                Ok(text) => parser.handle_text(&text),
                Err(err) => debug!(error = %err, "Skipping undecodable text node"),
            },
            Ok(Event::CData(e)) => {
                let raw = e.into_inner();
                parser.handle_text(&String::from_utf8_lossy(&raw));
            }
            Ok(Event::End(ref e)) => parser.handle_end(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!(
                    position = reader.buffer_position(),
                    error = %e,
                    "Malformed paper feed, keeping entries parsed so far"
                );
                break;
            }
            _ => {}
        }
    }

    parser.entries
}
