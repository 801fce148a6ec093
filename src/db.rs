//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - Running database migrations automatically

use std::str::FromStr;

use sqlx::{
    Pool, Postgres,
    postgres::{PgConnectOptions, PgSslMode},
};

use crate::config::Config;

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Build connection options from configuration.
///
/// `DATABASE_URL` wins when present; otherwise the options are assembled
/// from the individual `DB_*` settings.
///
/// # Errors
///
/// Returns an error if the URL or the SSL mode cannot be parsed.
pub fn connect_options(config: &Config) -> Result<PgConnectOptions, sqlx::Error> {
    if let Some(url) = &config.database_url {
        return PgConnectOptions::from_str(url);
    }

    Ok(PgConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_password)
        .database(&config.db_name)
        .ssl_mode(PgSslMode::from_str(&config.db_sslmode)?))
}

/// Create a new PostgreSQL connection pool.
///
/// A connection pool maintains multiple database connections that can be reused across HTTP requests which is much more efficient than opening a new connection for each request.
///
/// # Configuration
///
/// - Maximum connections: 5
/// - One connection is opened eagerly, so bad credentials fail at startup
///
/// # Errors
///
/// Returns an error if:
/// - Connection settings are invalid
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(config: &Config) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options(config)?)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each migration runs only once.
///
/// # Errors
///
/// Returns an error if:
/// - Migration files cannot be read
/// - SQL syntax errors in migration files
/// - Database errors during migration execution
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}
