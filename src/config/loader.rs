use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "athena.toml";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ATHENA_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 合并顺序（后者覆盖前者）：
    /// 1. 内置默认值
    /// 2. ./athena.toml
    /// 3. `ATHENA_` 前缀的环境变量，嵌套字段用 `__` 分隔（如 `ATHENA_SERVER__PORT`）
    /// 4. `PORT`
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        Self::figment(Toml::file(path)).extract()
    }

    /// 从 TOML 字符串加载配置（仍然应用环境变量覆盖）
    pub fn load_from_str(toml: &str) -> Result<AppConfig, figment::Error> {
        Self::figment(Toml::string(toml)).extract()
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        let research = &config.research;
        if research.summary_base_url.is_empty() {
            return Err(ConfigValidationError::MissingSourceUrl("summary_base_url"));
        }
        if research.paper_base_url.is_empty() {
            return Err(ConfigValidationError::MissingSourceUrl("paper_base_url"));
        }

        if research.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if research.recency_years == 0 {
            return Err(ConfigValidationError::InvalidRecencyWindow);
        }

        if research.max_keywords == 0 {
            return Err(ConfigValidationError::InvalidKeywordLimit);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("外部数据源地址未配置: {0}")]
    MissingSourceUrl(&'static str),

    #[error("请求超时无效，必须大于 0")]
    InvalidTimeout,

    #[error("论文时间窗口无效，必须大于 0 年")]
    InvalidRecencyWindow,

    #[error("关键词数量上限无效，必须大于 0")]
    InvalidKeywordLimit,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}
