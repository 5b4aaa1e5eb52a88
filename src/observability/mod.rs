//! 可观测性模块
//!
//! 提供计数器指标、结构化日志和健康检查。

use axum::{
    Json, Router,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::Layered, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::config::LoggingConfig;
use crate::services::router::Strategy;

// ===== Simple Metrics =====

/// 简单应用指标
#[derive(Default)]
pub struct AppMetrics {
    pub http_requests_total: AtomicU64,
    pub http_request_duration_sum: AtomicU64,
    pub active_connections: AtomicUsize,
    pub queries_total: AtomicU64,
    pub research_queries_total: AtomicU64,
    pub template_queries_total: AtomicU64,
    pub system_fallbacks_total: AtomicU64,
}

impl AppMetrics {
    /// 记录 HTTP 请求
    pub fn record_http_request(&self, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::SeqCst);
        self.http_request_duration_sum
            .fetch_add(duration_ms, Ordering::SeqCst);
    }

    /// 记录一次分发的查询
    pub fn record_query(&self, strategy: Strategy) {
        self.queries_total.fetch_add(1, Ordering::SeqCst);
        if strategy.uses_pipeline() {
            self.research_queries_total.fetch_add(1, Ordering::SeqCst);
        } else {
            self.template_queries_total.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// 记录一次降级为道歉回复
    pub fn record_fallback(&self) {
        self.system_fallbacks_total.fetch_add(1, Ordering::SeqCst);
    }

    /// 生成文本格式指标
    pub fn gather(&self) -> String {
        format!(
            r#"# HELP http_requests_total Total HTTP requests
# TYPE http_requests_total counter
http_requests_total {}
# HELP http_request_duration_seconds HTTP request duration in seconds
# TYPE http_request_duration_seconds histogram
http_request_duration_seconds_sum {}
http_request_duration_seconds_count {}
# HELP active_connections In-flight HTTP requests
# TYPE active_connections gauge
active_connections {}
# HELP queries_total Total dispatched queries
# TYPE queries_total counter
queries_total {}
# HELP research_queries_total Queries answered by the research pipeline
# TYPE research_queries_total counter
research_queries_total {}
# HELP template_queries_total Queries answered from a template
# TYPE template_queries_total counter
template_queries_total {}
# HELP system_fallbacks_total Queries that ended in the apology response
# TYPE system_fallbacks_total counter
system_fallbacks_total {}
"#,
            self.http_requests_total.load(Ordering::SeqCst),
            self.http_request_duration_sum.load(Ordering::SeqCst) as f64 / 1000.0,
            self.http_requests_total.load(Ordering::SeqCst),
            self.active_connections.load(Ordering::SeqCst),
            self.queries_total.load(Ordering::SeqCst),
            self.research_queries_total.load(Ordering::SeqCst),
            self.template_queries_total.load(Ordering::SeqCst),
            self.system_fallbacks_total.load(Ordering::SeqCst),
        )
    }
}

// ===== Health Check =====

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// 可观测性状态
#[derive(Clone)]
pub struct ObservabilityState {
    pub metrics: Arc<AppMetrics>,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(metrics: Arc<AppMetrics>, version: String) -> Self {
        Self {
            metrics,
            start_time: Utc::now(),
            version,
        }
    }

    /// 获取应用正常运行时间
    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }
}

/// 服务健康状态
pub async fn api_health() -> impl IntoResponse {
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "Research chatbot API is running".to_string(),
    })
}

/// 简单存活检查
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// 指标端点
pub async fn metrics(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    (axum::http::StatusCode::OK, state.metrics.gather())
}

/// 版本信息端点
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 创建可观测性路由
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/api/health", get(api_health))
        .route("/health/live", get(liveness))
        .route("/metrics", get(metrics))
        .route("/version", get(version))
        .with_state(state)
}

// ===== Structured Logging =====

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// 初始化日志
///
/// `RUST_LOG` 优先于配置中的级别。配置了 `log_dir` 时额外按天滚动写入 JSON 日志文件，
/// 返回的 guard 需要在进程存活期间保持持有。
pub fn init_tracing(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},athena={}", config.level, config.level)));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if config.structured {
        layers.push(fmt::layer().json().with_target(true).boxed());
    } else {
        layers.push(
            fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .boxed(),
        );
    }

    let guard = config.log_dir.as_ref().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "athena.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
        guard
    });

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
    {
        eprintln!("tracing subscriber already initialized: {}", e);
    }

    guard
}

// ===== Request Metrics Middleware =====

/// 记录请求指标的中间件
pub async fn metrics_middleware(
    State(metrics): State<Arc<AppMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let start = std::time::Instant::now();
    metrics.active_connections.fetch_add(1, Ordering::SeqCst);

    let response = next.run(req).await;

    metrics.record_http_request(start.elapsed().as_millis() as u64);
    metrics.active_connections.fetch_sub(1, Ordering::SeqCst);

    response
}
