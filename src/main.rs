use std::env;

use issue_tracker::api::{AppState, create_router};
use issue_tracker::infrastructure::{RepositoryConfig, RepositoryFactory};
use issue_tracker::server::{Server, ServerConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    init_tracing();

    tracing::info!("Starting issue tracker");

    let repository_config = RepositoryConfig::from_env()
        .inspect_err(|error| tracing::error!("Configuration error: {}", error))?;
    let server_config = ServerConfig::from_env()
        .inspect_err(|error| tracing::error!("Configuration error: {}", error))?;

    tracing::info!(
        storage_mode = ?repository_config.storage_mode,
        address = %server_config.socket_addr(),
        "Configuration loaded"
    );

    let repository = RepositoryFactory::new(repository_config)
        .create()
        .await
        .inspect_err(|error| tracing::error!("Failed to initialize storage: {}", error))?;

    let router = create_router(AppState::from_repository(repository));

    Server::new(server_config).run(router).await
}

/// Installs the global subscriber. `LOG_FORMAT=json` selects JSON output.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("issue_tracker=debug,tower_http=debug,info"));

    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }
}
