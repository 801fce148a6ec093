//! PostgreSQL token store.
//!
//! # Atomicity Guarantees
//!
//! Redemption runs inside a single transaction. The matching row is locked
//! with `FOR UPDATE` before it is mutated, and the mutation repeats the
//! `status = 0` predicate. A racing transaction blocks on the lock, then
//! re-reads the row, finds it redeemed (or deleted), and reports no match.

use async_trait::async_trait;

use crate::{
    config::{CreatedAtPolicy, RedemptionMode},
    db::DbPool,
    error::AppError,
    models::qr_code::{QrCode, TokenStatus},
};

use super::QrStore;

const UPSERT_PRESERVE_CREATED_AT: &str = r#"
    INSERT INTO qr_codes (user_id, random_string, status, created_at, updated_at)
    VALUES ($1, $2, $3, NOW(), NOW())
    ON CONFLICT (user_id)
    DO UPDATE SET
        random_string = EXCLUDED.random_string,
        status = EXCLUDED.status,
        updated_at = EXCLUDED.updated_at
    RETURNING user_id, random_string, status, created_at, updated_at
"#;

const UPSERT_RESET_CREATED_AT: &str = r#"
    INSERT INTO qr_codes (user_id, random_string, status, created_at, updated_at)
    VALUES ($1, $2, $3, NOW(), NOW())
    ON CONFLICT (user_id)
    DO UPDATE SET
        random_string = EXCLUDED.random_string,
        status = EXCLUDED.status,
        created_at = EXCLUDED.created_at,
        updated_at = EXCLUDED.updated_at
    RETURNING user_id, random_string, status, created_at, updated_at
"#;

/// Token store backed by the `qr_codes` table.
#[derive(Debug, Clone)]
pub struct PgQrStore {
    pool: DbPool,
    created_at_policy: CreatedAtPolicy,
    redemption_mode: RedemptionMode,
}

impl PgQrStore {
    pub fn new(
        pool: DbPool,
        created_at_policy: CreatedAtPolicy,
        redemption_mode: RedemptionMode,
    ) -> Self {
        Self {
            pool,
            created_at_policy,
            redemption_mode,
        }
    }
}

#[async_trait]
impl QrStore for PgQrStore {
    async fn upsert(&self, user_id: &str, token: &str) -> Result<QrCode, AppError> {
        let query = match self.created_at_policy {
            CreatedAtPolicy::Preserve => UPSERT_PRESERVE_CREATED_AT,
            CreatedAtPolicy::Reset => UPSERT_RESET_CREATED_AT,
        };

        let row = sqlx::query_as::<_, QrCode>(query)
            .bind(user_id)
            .bind(token)
            .bind(TokenStatus::Unredeemed)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn get(&self, user_id: &str) -> Result<QrCode, AppError> {
        sqlx::query_as::<_, QrCode>(
            r#"
            SELECT user_id, random_string, status, created_at, updated_at
            FROM qr_codes
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    /// Verify and consume a token.
    ///
    /// # Process
    ///
    /// 1. Start database transaction
    /// 2. Lock the matching unredeemed row
    /// 3. Mark it redeemed, or delete it, depending on `RedemptionMode`
    /// 4. Commit (or rollback when nothing matched)
    async fn verify_and_consume(&self, user_id: &str, token: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // FOR UPDATE makes concurrent redemptions of the same row queue up
        let locked: Option<String> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM qr_codes
            WHERE user_id = $1 AND random_string = $2 AND status = $3
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(TokenStatus::Unredeemed)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        let consumed = match self.redemption_mode {
            RedemptionMode::Mark => {
                sqlx::query(
                    r#"
                    UPDATE qr_codes
                    SET status = $4,
                        updated_at = NOW()
                    WHERE user_id = $1 AND random_string = $2 AND status = $3
                    "#,
                )
                .bind(user_id)
                .bind(token)
                .bind(TokenStatus::Unredeemed)
                .bind(TokenStatus::Redeemed)
                .execute(&mut *tx)
                .await?
            }
            RedemptionMode::Delete => {
                sqlx::query(
                    r#"
                    DELETE FROM qr_codes
                    WHERE user_id = $1 AND random_string = $2 AND status = $3
                    "#,
                )
                .bind(user_id)
                .bind(token)
                .bind(TokenStatus::Unredeemed)
                .execute(&mut *tx)
                .await?
            }
        }
        .rows_affected();

        if consumed != 1 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
