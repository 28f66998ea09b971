//! Configuration management for Prixfixe Core

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Batch streaming configuration
    pub batch: BatchConfig,
    /// Logging configuration
    pub telemetry: TelemetryConfig,
    /// Apply schema migrations on startup
    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Number of pings attempted before the database is reported unavailable
    pub readiness_attempts: u32,
    pub readiness_interval_ms: u64,
}

impl DatabaseConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout_secs: 30,
            readiness_attempts: 50,
            readiness_interval_ms: 1000,
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }
}

/// Settings for the id-bucketed `get_all` streamers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Ids covered by a single bucket query
    pub bucket_size: u64,
    /// Bucket queries allowed in flight at once
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            bucket_size: 1000,
            concurrency: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "plain" or "json"
    pub log_format: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "plain".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let batch = BatchConfig {
            bucket_size: env::var("BATCH_BUCKET_SIZE")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("Invalid BATCH_BUCKET_SIZE")?,
            concurrency: env::var("BATCH_CONCURRENCY")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .context("Invalid BATCH_CONCURRENCY")?,
        };
        if batch.bucket_size == 0 || batch.concurrency == 0 {
            anyhow::bail!("BATCH_BUCKET_SIZE and BATCH_CONCURRENCY must be positive");
        }

        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").context("DATABASE_URL is required")?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .unwrap_or(2),
                acquire_timeout_secs: env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid DATABASE_ACQUIRE_TIMEOUT_SECS")?,
                readiness_attempts: env::var("DATABASE_READINESS_ATTEMPTS")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()
                    .context("Invalid DATABASE_READINESS_ATTEMPTS")?,
                readiness_interval_ms: env::var("DATABASE_READINESS_INTERVAL_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .context("Invalid DATABASE_READINESS_INTERVAL_MS")?,
            },
            batch,
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT")
                    .map(|s| s.to_lowercase())
                    .unwrap_or_else(|_| "plain".to_string()),
            },
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_defaults() {
        let config = DatabaseConfig::with_url("postgres://localhost/prixfixe");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.readiness_attempts, 50);
        assert_eq!(config.readiness_interval(), Duration::from_secs(1));
        assert_eq!(config.acquire_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_batch_config_default() {
        let batch = BatchConfig::default();
        assert_eq!(batch.bucket_size, 1000);
        assert_eq!(batch.concurrency, 8);
    }

    #[test]
    fn test_config_clone() {
        let config = Config {
            database: DatabaseConfig::with_url("postgres://localhost/prixfixe"),
            batch: BatchConfig::default(),
            telemetry: TelemetryConfig::default(),
            run_migrations: true,
        };
        let cloned = config.clone();
        assert_eq!(cloned.database.url, config.database.url);
        assert_eq!(cloned.batch, config.batch);
        assert_eq!(cloned.telemetry.log_format, "plain");
    }

    #[test]
    fn test_database_config_debug() {
        let config = DatabaseConfig::with_url("postgres://localhost/prixfixe");
        let debug = format!("{:?}", config);
        assert!(debug.contains("DatabaseConfig"));
        assert!(debug.contains("max_connections"));
    }
}
