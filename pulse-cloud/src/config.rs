//! Pulse cloud configuration

use pulse_engine::EngineSettings;
use pulse_engine::settings::{
    DEFAULT_ASSUMED_COGS_RATE, DEFAULT_DISCOUNT_GUARDRAIL_PCT, DEFAULT_FEE_ALERT_RATIO,
    DEFAULT_SLOW_DELIVERY_DAYS,
};

/// Default upload body limit (20MB)
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; unset selects the in-memory store
    pub database_url: Option<String>,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Default log filter (RUST_LOG overrides)
    pub log_level: String,
    /// JSON console output
    pub log_json: bool,
    /// Rolling file logs are written here when set
    pub log_dir: Option<String>,
    /// Upload body limit in bytes
    pub max_upload_bytes: usize,
    /// Engine thresholds
    pub engine: EngineSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            http_port: 8080,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            engine: EngineSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        let engine = EngineSettings {
            assumed_cogs_rate: env_parse("ASSUMED_COGS_RATE").unwrap_or(DEFAULT_ASSUMED_COGS_RATE),
            fee_alert_ratio: env_parse("FEE_ALERT_RATIO").unwrap_or(DEFAULT_FEE_ALERT_RATIO),
            slow_delivery_days: env_parse("SLOW_DELIVERY_DAYS").unwrap_or(DEFAULT_SLOW_DELIVERY_DAYS),
            discount_guardrail_pct: env_parse("DISCOUNT_GUARDRAIL_PCT")
                .unwrap_or(DEFAULT_DISCOUNT_GUARDRAIL_PCT),
            ..EngineSettings::default()
        };

        Self {
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            http_port: env_parse("HTTP_PORT").unwrap_or(8080),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON").unwrap_or(is_production),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            environment,
            engine,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_memory_store() {
        let config = Config::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert!(!config.is_production());
        assert!(config.engine.validate().is_ok());
    }
}
