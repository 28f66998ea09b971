//! Unified error handling for Prixfixe Core

use thiserror::Error;

/// SQLSTATE reported by PostgreSQL when a unique constraint rejects a row.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// No row matched, or a guarded write affected nothing.
    #[error("no rows in result set")]
    NotFound,

    #[error("{context}: {source}")]
    Database {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse classification callers use to translate storage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Transient,
    Scan,
    InvalidInput,
    Internal,
}

impl AppError {
    /// Wrap a driver error with a short description of the failed operation.
    ///
    /// `RowNotFound` is never wrapped so that "not found" stays comparable.
    pub fn database(context: impl Into<String>, source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::RowNotFound => AppError::NotFound,
            source => AppError::Database {
                context: context.into(),
                source,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound)
    }

    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database {
                source: sqlx::Error::Database(db),
                ..
            } => db.code().as_deref() == Some(UNIQUE_VIOLATION),
            _ => false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound => ErrorKind::NotFound,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::Internal(_) => ErrorKind::Internal,
            AppError::Database { .. } if self.is_unique_violation() => ErrorKind::Conflict,
            AppError::Database { source, .. } => match source {
                sqlx::Error::ColumnDecode { .. }
                | sqlx::Error::ColumnIndexOutOfBounds { .. }
                | sqlx::Error::ColumnNotFound(_)
                | sqlx::Error::Decode(_)
                | sqlx::Error::TypeNotFound { .. } => ErrorKind::Scan,
                sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::Protocol(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed => ErrorKind::Transient,
                _ => ErrorKind::Internal,
            },
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::database("database error", err)
    }
}
