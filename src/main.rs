use athena::api::{self, app_state::AppState};
use athena::config::loader::{ConfigLoader, config_exists};
use athena::observability::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;

    let _guard = init_tracing(&config.logging);
    info!("Starting Athena...");
    if config_exists() {
        info!("Configuration loaded from file and environment");
    } else {
        info!("No config file found, using defaults and environment");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(
        "Research sources: summaries={}, papers={}",
        config.research.summary_base_url, config.research.paper_base_url
    );

    let app_state = AppState::from_config(config)?;
    info!("Application state created");

    let router = api::initialize_api(app_state).await?;
    info!("API router created with observability endpoints");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
