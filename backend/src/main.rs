//! Service entry-point: loads settings, prepares storage and event
//! publishing, then serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use legal_entities::inbound::http::health::HealthState;
use legal_entities::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use legal_entities::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let mut config = ServerConfig::new(settings.bind_addr())
        .with_notification_timeout(settings.notification_timeout());

    if let Some(database_url) = settings.database_url.as_deref() {
        config = config.with_db_pool(connect(&settings, database_url).await?);
    }

    if let Some(endpoint) = settings.events_endpoint.as_deref() {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            std::io::Error::other(format!("invalid events endpoint {endpoint}: {e}"))
        })?;
        config = config.with_events_endpoint(endpoint, settings.event_topics());
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::build_prometheus()?));

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %settings.bind_addr(), "starting legal entities service");
    create_server(health_state, config)?.await
}

/// Apply migrations when enabled and open the connection pool.
async fn connect(settings: &AppSettings, database_url: &str) -> std::io::Result<DbPool> {
    if settings.run_migrations {
        run_pending_migrations(database_url)
            .await
            .map_err(|e| std::io::Error::other(format!("database migration failed: {e}")))?;
        info!("database migrations applied");
    }

    DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_max_connections()))
        .await
        .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))
}
