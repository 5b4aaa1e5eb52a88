//! 百科摘要客户端

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::research::Lookup;
use crate::sources::SummarySource;

/// Wikipedia REST `page/summary` 客户端
pub struct WikipediaSummaryClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    extract: Option<String>,
}

impl WikipediaSummaryClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 主题按 URL 编码后作为路径最后一段
    pub fn summary_url(&self, topic: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(topic))
    }

    async fn request(&self, topic: &str) -> Result<Option<String>> {
        let response = self.client.get(self.summary_url(topic)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "summary source returned {}",
                status
            )));
        }

        let body: SummaryResponse = response.json().await?;
        Ok(body.extract.filter(|extract| !extract.trim().is_empty()))
    }
}

#[async_trait]
impl SummarySource for WikipediaSummaryClient {
    async fn fetch_summary(&self, topic: &str) -> Lookup<String> {
        debug!(topic, "Fetching reference summary");

        match self.request(topic).await {
            Ok(Some(extract)) => {
                info!(topic, chars = extract.chars().count(), "Reference summary found");
                Lookup::Found(extract)
            }
            Ok(None) => {
                debug!(topic, "Summary source response has no extract");
                Lookup::Unavailable
            }
            Err(e) => {
                warn!(topic, error = %e, "Reference lookup failed");
                Lookup::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_url_encodes_topic() {
        let client = WikipediaSummaryClient::new(
            reqwest::Client::new(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/",
        );

        assert_eq!(
            client.summary_url("quantum computing"),
            "https://en.wikipedia.org/api/rest_v1/page/summary/quantum%20computing"
        );
        assert_eq!(
            client.summary_url("C++/CLI"),
            "https://en.wikipedia.org/api/rest_v1/page/summary/C%2B%2B%2FCLI"
        );
    }
}
