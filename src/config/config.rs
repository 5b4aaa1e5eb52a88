use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 允许跨域访问的来源
    pub cors_origins: Vec<String>,
    /// 每个会话广播通道的容量
    pub channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
            cors_origins: vec!["http://localhost:3000".into()],
            channel_capacity: 64,
        }
    }
}

/// 研究流水线配置
///
/// 检索窗口、关键词数量等策略常量都放在这里，调整时无需改动流水线代码。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// 百科摘要服务地址（主题会被 URL 编码后拼接在末尾）
    pub summary_base_url: String,
    /// 论文检索服务地址
    pub paper_base_url: String,
    /// 外部请求超时（秒）
    pub request_timeout_secs: u64,
    /// HTTP User-Agent
    pub user_agent: String,
    /// 论文时间窗口（年）
    pub recency_years: u32,
    /// 从摘要中选取的高频词数量
    pub top_keywords: usize,
    /// 关键词列表最大长度（包含主题本身）
    pub max_keywords: usize,
    /// 关键词最小长度（严格大于）
    pub min_keyword_len: usize,
    /// 参与检索式构建的关键词数量
    pub search_keyword_count: usize,
    /// 单次检索请求的结果数
    pub max_results: usize,
    /// 解析阶段保留的候选论文上限
    pub max_candidates: usize,
    /// 论文摘要截断长度（字符）
    pub summary_max_chars: usize,
    /// 标题最小长度（字符）
    pub min_title_chars: usize,
    /// 最终展示的论文数量
    pub max_ranked: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            summary_base_url: "https://en.wikipedia.org/api/rest_v1/page/summary".into(),
            paper_base_url: "http://export.arxiv.org/api/query".into(),
            request_timeout_secs: 10,
            user_agent: concat!("athena/", env!("CARGO_PKG_VERSION")).into(),
            recency_years: 6,
            top_keywords: 3,
            max_keywords: 5,
            min_keyword_len: 4,
            search_keyword_count: 3,
            max_results: 20,
            max_candidates: 5,
            summary_max_chars: 300,
            min_title_chars: 5,
            max_ranked: 5,
        }
    }
}

impl ResearchConfig {
    /// 外部请求超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化（JSON）日志格式
    pub structured: bool,
    /// 日志文件目录，未设置时只输出到标准输出
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
            log_dir: None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 研究流水线配置
    pub research: ResearchConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig::default(),
            research: ResearchConfig::default(),
            logging: LoggingConfig {
                level: "debug".into(),
                ..LoggingConfig::default()
            },
            app_name: "athena".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config
    }
}
