//! Token storage.
//!
//! Handlers talk to storage only through the [`QrStore`] trait, held as a
//! shared `Arc<dyn QrStore>` in the router state. Two backends exist:
//!
//! - [`PgQrStore`]: PostgreSQL via sqlx, the production backend
//! - [`MemoryQrStore`]: an ephemeral map for development and tests
//!
//! # Redemption Guarantee
//!
//! `verify_and_consume` is the only operation with a concurrency contract:
//! of any number of racing calls for the same valid token, exactly one
//! returns `true`.

mod memory;
mod postgres;

pub use memory::MemoryQrStore;
pub use postgres::PgQrStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{Config, StoreBackend},
    db,
    error::AppError,
    models::qr_code::QrCode,
};

/// Storage operations for redemption tokens.
#[async_trait]
pub trait QrStore: Send + Sync {
    /// Insert or overwrite the token for `user_id`.
    ///
    /// Resets the status to unredeemed and refreshes `updated_at`. Any
    /// previously issued token for the user stops verifying.
    async fn upsert(&self, user_id: &str, token: &str) -> Result<QrCode, AppError>;

    /// Fetch the current row for `user_id`.
    ///
    /// # Errors
    ///
    /// `AppError::NotFound` if the user has no row.
    async fn get(&self, user_id: &str) -> Result<QrCode, AppError>;

    /// Atomically check that `token` is the user's unredeemed token and
    /// consume it.
    ///
    /// Returns `Ok(false)` without mutating anything when there is no match.
    async fn verify_and_consume(&self, user_id: &str, token: &str) -> Result<bool, AppError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Build the store selected by `STORE_BACKEND`.
///
/// For PostgreSQL this opens the pool and runs migrations before returning.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn QrStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = db::create_pool(config).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Ok(Arc::new(PgQrStore::new(
                pool,
                config.created_at_policy,
                config.redemption_mode,
            )))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; tokens are lost on restart");
            Ok(Arc::new(MemoryQrStore::new(
                config.created_at_policy,
                config.redemption_mode,
            )))
        }
    }
}
