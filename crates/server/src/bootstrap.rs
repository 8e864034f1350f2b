use std::sync::Arc;

use antar_agent::AgentRuntime;
use antar_core::config::{AppConfig, ConfigError, SessionBackend};
use antar_core::flows::DialogueEngine;
use antar_core::pricing::TariffTable;
use antar_db::{
    connect_with_settings, migrations, DbPool, InMemorySessionStore, ReservationRepository,
    SessionStore, SqlReservationRepository, SqlSessionStore,
};
use axum::Router;
use thiserror::Error;
use tracing::info;

use crate::{chat, health, reports};

pub type ChatRuntime = AgentRuntime<Arc<dyn SessionStore>, Arc<dyn ReservationRepository>>;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub sessions: Arc<dyn SessionStore>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub agent_runtime: Arc<ChatRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

impl Application {
    pub fn router(&self) -> Router {
        Router::new()
            .merge(chat::router(self.agent_runtime.clone()))
            .merge(reports::router(self.reservations.clone()))
            .merge(health::router(self.db_pool.clone()))
    }
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let ttl = config.dialogue.session_ttl()?;
    let sessions: Arc<dyn SessionStore> = match config.dialogue.session_backend {
        SessionBackend::Memory => Arc::new(InMemorySessionStore::new(ttl)),
        SessionBackend::Sqlite => Arc::new(SqlSessionStore::new(db_pool.clone(), ttl)),
    };
    let reservations: Arc<dyn ReservationRepository> =
        Arc::new(SqlReservationRepository::new(db_pool.clone()));
    info!(
        event_name = "system.bootstrap.session_store_ready",
        correlation_id = "bootstrap",
        session_backend = config.dialogue.session_backend.as_str(),
        session_ttl_secs = config.dialogue.session_ttl_secs,
        "session store initialized"
    );

    let engine = DialogueEngine::new(TariffTable::default(), config.dialogue.error_policy()?);
    let agent_runtime =
        Arc::new(AgentRuntime::new(sessions.clone(), reservations.clone(), engine));

    Ok(Application { config, db_pool, sessions, reservations, agent_runtime })
}
