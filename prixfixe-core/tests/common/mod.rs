//! Common test utilities
//!
//! Every test gets its own freshly migrated database on the server named by
//! `DATABASE_URL`. Without a reachable server the tests print a notice and
//! return early.

use anyhow::{Context, Result};
use prixfixe_core::config::{BatchConfig, Config, DatabaseConfig, TelemetryConfig};
use prixfixe_core::migration;
use prixfixe_core::Postgres;
use std::sync::Once;

/// Ensure .env file is loaded once
static ENV_INIT: Once = Once::new();

fn init_env() {
    ENV_INIT.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

/// Point `url` at the database `name`, keeping credentials and options.
fn with_database(url: &str, name: &str) -> String {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (url, None),
    };
    let base = match path.rsplit_once('/') {
        Some((base, _)) if !base.ends_with('/') => base,
        _ => path.trim_end_matches('/'),
    };
    match query {
        Some(query) => format!("{}/{}?{}", base, name, query),
        None => format!("{}/{}", base, name),
    }
}

fn test_config(url: String) -> Config {
    let mut database = DatabaseConfig::with_url(url);
    database.max_connections = 5;
    database.min_connections = 0;
    database.acquire_timeout_secs = 5;
    database.readiness_attempts = 3;
    database.readiness_interval_ms = 100;

    Config {
        database,
        // small buckets so streaming crosses several of them
        batch: BatchConfig {
            bucket_size: 2,
            concurrency: 2,
        },
        telemetry: TelemetryConfig::default(),
        run_migrations: true,
    }
}

/// A migrated, empty database of its own.
pub async fn test_postgres() -> Result<Postgres> {
    init_env();
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let name = format!("prixfixe_test_{}", uuid::Uuid::new_v4().simple());
    let url = with_database(&url, &name);

    migration::ensure_database_exists(&url).await?;

    let postgres = Postgres::provide(&test_config(url))?;
    if !postgres.is_ready().await {
        anyhow::bail!("database {} never became ready", name);
    }
    postgres.migrate().await?;
    Ok(postgres)
}

#[allow(dead_code)]
/// Insert a bare user row to hang user-owned records off.
pub async fn create_user(postgres: &Postgres, username: &str) -> Result<u64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, hashed_password) VALUES ($1, $2) RETURNING id",
    )
    .bind(username)
    .bind("$argon2id$v=19$not-a-real-hash")
    .fetch_one(postgres.database().pool())
    .await
    .context("Failed to create user")?;
    Ok(id as u64)
}

macro_rules! postgres_or_skip {
    () => {
        match common::test_postgres().await {
            Ok(postgres) => postgres,
            Err(e) => {
                eprintln!("Skipping test: could not connect to database: {:#}", e);
                return;
            }
        }
    };
}
