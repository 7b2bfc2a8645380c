//! Application state for pulse-cloud

use std::sync::Arc;

use pulse_engine::EngineSettings;

use crate::config::Config;
use crate::db::{MemoryReportStore, PgReportStore, ReportStore};
use crate::error::ServiceResult;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Report persistence (Postgres or in-memory)
    pub store: Arc<dyn ReportStore>,
    /// Engine thresholds applied to every request
    pub settings: EngineSettings,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect to Postgres when `DATABASE_URL` is set, otherwise keep reports in memory
    pub async fn new(config: &Config) -> ServiceResult<Self> {
        let store: Arc<dyn ReportStore> = match &config.database_url {
            Some(url) => {
                let store = PgReportStore::connect(url).await?;
                tracing::info!("Report store: PostgreSQL");
                Arc::new(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, reports are kept in memory only");
                Arc::new(MemoryReportStore::new())
            }
        };
        Ok(Self::with_store(config.clone(), store))
    }

    pub fn with_store(config: Config, store: Arc<dyn ReportStore>) -> Self {
        Self {
            store,
            settings: config.engine,
            config: Arc::new(config),
        }
    }
}
