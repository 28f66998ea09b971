use anyhow::{bail, Context, Result};
use prixfixe_core::{config::Config, migration, telemetry, Postgres};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    telemetry::init(&config.telemetry)?;
    info!("Starting Prixfixe Core");

    if config.run_migrations {
        migration::ensure_database_exists(&config.database.url).await?;
    }

    let postgres = Postgres::provide(&config).context("Failed to set up database")?;
    if !postgres.is_ready().await {
        bail!("database never became ready");
    }

    if config.run_migrations {
        postgres.migrate().await.context("Failed to migrate database")?;
    }

    info!("Database is ready and migrated");
    Ok(())
}
