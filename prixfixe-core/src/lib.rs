//! Prixfixe Core - PostgreSQL persistence for the recipe service
//!
//! Typed repositories for the ingredient catalog, recipes and everything
//! hanging off them, invitations and OAuth2 clients, all sharing one pool
//! and a small SQL builder.

pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod migration;
pub mod querybuilding;
pub mod repository;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use database::{Database, Postgres};
pub use error::{AppError, Result};
