//! In-memory token store.
//!
//! Every operation takes the same lock, so the check and the mutation in
//! `verify_and_consume` can never interleave with another call.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config::{CreatedAtPolicy, RedemptionMode},
    error::AppError,
    models::qr_code::{QrCode, TokenStatus},
};

use super::QrStore;

#[derive(Debug, Default)]
pub struct MemoryQrStore {
    rows: Mutex<HashMap<String, QrCode>>,
    created_at_policy: CreatedAtPolicy,
    redemption_mode: RedemptionMode,
}

impl MemoryQrStore {
    pub fn new(created_at_policy: CreatedAtPolicy, redemption_mode: RedemptionMode) -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            created_at_policy,
            redemption_mode,
        }
    }
}

#[async_trait]
impl QrStore for MemoryQrStore {
    async fn upsert(&self, user_id: &str, token: &str) -> Result<QrCode, AppError> {
        let now = Utc::now();
        let mut rows = self.rows.lock().await;

        let created_at = match (self.created_at_policy, rows.get(user_id)) {
            (CreatedAtPolicy::Preserve, Some(existing)) => existing.created_at,
            _ => now,
        };

        let row = QrCode {
            user_id: user_id.to_string(),
            random_string: token.to_string(),
            status: TokenStatus::Unredeemed,
            created_at,
            updated_at: now,
        };
        rows.insert(user_id.to_string(), row.clone());

        Ok(row)
    }

    async fn get(&self, user_id: &str) -> Result<QrCode, AppError> {
        self.rows
            .lock()
            .await
            .get(user_id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn verify_and_consume(&self, user_id: &str, token: &str) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().await;

        let matches = rows.get(user_id).is_some_and(|row| {
            row.random_string == token && row.status == TokenStatus::Unredeemed
        });
        if !matches {
            return Ok(false);
        }

        match self.redemption_mode {
            RedemptionMode::Mark => {
                if let Some(row) = rows.get_mut(user_id) {
                    row.status = TokenStatus::Redeemed;
                    row.updated_at = Utc::now();
                }
            }
            RedemptionMode::Delete => {
                rows.remove(user_id);
            }
        }

        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
