use crate::config::config::AppConfig;
use crate::error::Result;
use crate::observability::AppMetrics;
use crate::services::chat::ChatService;
use crate::services::research::ResearchAgent;
use crate::services::router::QueryRouter;
use crate::sources::{PaperSource, SummarySource, create_paper_source, create_summary_source};
use crate::storage::{ConversationStore, create_conversation_store};
use crate::websocket::hub::ConversationHub;
use std::sync::Arc;

/// Application state shared by the REST and WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Query dispatcher (the single processing entry point)
    pub router: Arc<QueryRouter>,
    /// Conversation flow: store, broadcast, answer
    pub chat: Arc<ChatService>,
    /// Conversation history storage
    pub store: Arc<dyn ConversationStore>,
    /// Per-conversation broadcast channels
    pub hub: Arc<ConversationHub>,
    /// Request and query counters
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("router", &"Arc<QueryRouter>")
            .field("chat", &"Arc<ChatService>")
            .field("store", &"Arc<dyn ConversationStore>")
            .field("hub", &"Arc<ConversationHub>")
            .field("metrics", &"Arc<AppMetrics>")
            .finish()
    }
}

impl AppState {
    /// Create new application state from explicit sources and storage
    pub fn new(
        config: AppConfig,
        summary_source: Box<dyn SummarySource>,
        paper_source: Box<dyn PaperSource>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        let metrics = Arc::new(AppMetrics::default());
        let agent = ResearchAgent::new(
            Arc::from(summary_source),
            Arc::from(paper_source),
            config.research.clone(),
        );
        let router = Arc::new(QueryRouter::new(agent, metrics.clone()));
        let hub = Arc::new(ConversationHub::new(config.server.channel_capacity));
        let chat = Arc::new(ChatService::new(store.clone(), router.clone(), hub.clone()));

        Self {
            config: Arc::new(config),
            router,
            chat,
            store,
            hub,
            metrics,
        }
    }

    /// Create application state backed by the HTTP sources and in-memory storage
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let summary_source = create_summary_source(&config.research)?;
        let paper_source = create_paper_source(&config.research)?;
        Ok(Self::new(
            config,
            summary_source,
            paper_source,
            create_conversation_store(),
        ))
    }
}
