//! Database layer with SQL templates and repositories.
//!
//! This crate provides:
//! - A store of named SQL templates with optional filter clauses
//! - Named-to-positional parameter binding for PostgreSQL
//! - Repository implementations of the core ledger traits

pub mod repositories;
pub mod statement;
pub mod templates;

pub use repositories::CashRepository;
pub use templates::{PreparedQuery, SqlTemplateStore, TemplateArgs, TemplateError};

use std::time::Duration;

use caixa_shared::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}
