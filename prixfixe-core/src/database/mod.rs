//! PostgreSQL connection handle
//!
//! Every statement issued by the repositories goes through [`Database`], which
//! binds the builder's arguments and records the SQL at debug level.

mod postgres;

pub use postgres::Postgres;

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::querybuilding::{Arg, Statement};
use futures::stream::{self, BoxStream, StreamExt};
use sqlx::postgres::{PgArguments, PgPoolOptions, PgQueryResult, PgRow};
use sqlx::query::Query;
use sqlx::{Connection, PgPool};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    readiness_attempts: u32,
    readiness_interval: Duration,
}

impl Database {
    /// Build a lazily connecting pool; no connection is opened until first use.
    pub fn connect(config: &DatabaseConfig) -> Result<Self> {
        debug!(url = %config.url, "establishing connection to postgres");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy(&config.url)
            .map_err(|e| AppError::database("connecting to postgres", e))?;

        Ok(Self {
            pool,
            readiness_attempts: config.readiness_attempts,
            readiness_interval: config.readiness_interval(),
        })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            readiness_attempts: 50,
            readiness_interval: Duration::from_secs(1),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database("acquiring connection", e))?;
        conn.ping()
            .await
            .map_err(|e| AppError::database("pinging database", e))
    }

    /// Ping until the database answers or the attempts run out.
    ///
    /// The wait between attempts is not interrupted by the caller.
    pub async fn is_ready(&self) -> bool {
        for attempt in 1..=self.readiness_attempts {
            match self.ping().await {
                Ok(()) => {
                    info!(attempt, "database is ready");
                    return true;
                }
                Err(e) => {
                    debug!(attempt, error = %e, "database not ready yet");
                    if attempt < self.readiness_attempts {
                        tokio::time::sleep(self.readiness_interval).await;
                    }
                }
            }
        }
        warn!(attempts = self.readiness_attempts, "database never became ready");
        false
    }

    /// Fetch exactly one row; an empty result is [`AppError::NotFound`].
    pub async fn fetch_one(&self, context: &str, statement: &Statement) -> Result<PgRow> {
        log_statement(context, statement);
        bind(statement)?
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(context, e))
    }

    pub async fn fetch_all(
        &self,
        context: &str,
        statement: &Statement,
    ) -> Result<Vec<PgRow>> {
        log_statement(context, statement);
        bind(statement)?
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(context, e))
    }

    /// Stream rows one at a time for the scanner protocol.
    pub fn fetch<'a>(
        &'a self,
        context: &'a str,
        statement: &'a Statement,
    ) -> Result<RowStream<'a>> {
        log_statement(context, statement);
        let inner = bind(statement)?.fetch(&self.pool);
        Ok(RowStream { context, inner })
    }

    pub async fn execute(
        &self,
        context: &str,
        statement: &Statement,
    ) -> Result<PgQueryResult> {
        log_statement(context, statement);
        bind(statement)?
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(context, e))
    }
}

/// Rows of an in-flight query.
pub struct RowStream<'a> {
    context: &'a str,
    inner: BoxStream<'a, std::result::Result<PgRow, sqlx::Error>>,
}

impl<'a> RowStream<'a> {
    pub async fn next_row(&mut self) -> Option<std::result::Result<PgRow, sqlx::Error>> {
        let row = self.inner.next().await;
        if let Some(Ok(_)) = &row {
            trace!(context = self.context, "row received");
        }
        row
    }

    /// Drop the underlying cursor. Further reads yield nothing.
    pub fn close(&mut self) {
        self.inner = stream::empty().boxed();
    }
}

fn log_statement(context: &str, statement: &Statement) {
    debug!(
        context,
        sql = %statement.sql,
        args = %serde_json::to_string(&statement.args).unwrap_or_default(),
        "running query"
    );
}

fn bind(statement: &Statement) -> Result<Query<'_, sqlx::Postgres, PgArguments>> {
    let mut query = sqlx::query(&statement.sql);
    for arg in &statement.args {
        query = match arg {
            Arg::BigInt(v) => query.bind(to_bigint(*v)?),
            Arg::NullableBigInt(v) => query.bind(v.map(to_bigint).transpose()?),
            Arg::Real(v) => query.bind(*v),
            Arg::Text(v) => query.bind(v.as_str()),
            Arg::Bool(v) => query.bind(*v),
        };
    }
    Ok(query)
}

fn to_bigint(v: u64) -> Result<i64> {
    i64::try_from(v)
        .map_err(|_| AppError::InvalidInput(format!("{} does not fit in a BIGINT column", v)))
}
