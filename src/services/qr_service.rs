//! QR code service - issuing and redeeming single-use tokens.
//!
//! This service handles:
//! - `user_id` validation
//! - Token generation and persistence
//! - Payload parsing and atomic redemption

use crate::{
    error::AppError,
    payload::{PAYLOAD_DELIMITER, format_payload, parse_payload},
    qr,
    store::QrStore,
    token::generate_token,
};

/// Longest accepted `user_id`, matching `VARCHAR(255)` in the schema.
pub const MAX_USER_ID_LENGTH: usize = 255;

/// Reject user ids that could never be stored or verified.
///
/// An id containing the payload delimiter would produce a payload that
/// fails to parse on redemption. NUL is not storable in a Postgres text
/// column.
pub fn validate_user_id(user_id: &str) -> Result<(), AppError> {
    if user_id.is_empty() {
        return Err(AppError::InvalidRequest("user_id is required".to_string()));
    }

    if user_id.chars().count() > MAX_USER_ID_LENGTH {
        return Err(AppError::InvalidRequest(format!(
            "user_id must be at most {MAX_USER_ID_LENGTH} characters"
        )));
    }

    if user_id.contains(PAYLOAD_DELIMITER) {
        return Err(AppError::InvalidRequest(format!(
            "user_id must not contain '{PAYLOAD_DELIMITER}'"
        )));
    }

    if user_id.contains('\0') {
        return Err(AppError::InvalidRequest(
            "user_id must not contain NUL characters".to_string(),
        ));
    }

    Ok(())
}

/// Issue a new token for `user_id` and render it as a PNG.
///
/// # Process
///
/// 1. Validate the user id
/// 2. Generate a fresh token
/// 3. Upsert it, overwriting any previous token for the user
/// 4. Render `user_id:token` to a `image_size`-pixel PNG
///
/// The upsert happens before rendering. If rendering fails the request
/// fails, but the new token is already the user's only valid one.
///
/// # Errors
///
/// - `InvalidRequest`: user id is empty, too long, or contains the delimiter
/// - `Database`: the upsert failed
/// - `QrEncoding`: the image could not be produced
pub async fn issue_qr_code(
    store: &dyn QrStore,
    user_id: &str,
    image_size: u32,
) -> Result<Vec<u8>, AppError> {
    validate_user_id(user_id)?;

    let token = generate_token();
    store.upsert(user_id, &token).await?;
    tracing::info!(user_id, "QR code issued");

    qr::render_png(&format_payload(user_id, &token), image_size)
}

/// Redeem a scanned payload.
///
/// Returns `Ok(true)` exactly once per issued token. Malformed payloads,
/// unknown users, wrong tokens and already-redeemed tokens all return
/// `Ok(false)`. So do payloads containing NUL, which no issued token
/// can contain.
///
/// # Errors
///
/// - `InvalidRequest`: `qr_data` is empty
/// - `Database`: the redemption transaction failed
pub async fn redeem_qr_code(store: &dyn QrStore, qr_data: &str) -> Result<bool, AppError> {
    if qr_data.is_empty() {
        return Err(AppError::InvalidRequest("qr_data is required".to_string()));
    }

    let Some((user_id, token)) = parse_payload(qr_data).filter(|_| !qr_data.contains('\0'))
    else {
        tracing::debug!("Malformed QR payload");
        return Ok(false);
    };

    let redeemed = store.verify_and_consume(user_id, token).await?;
    if redeemed {
        tracing::info!(user_id, "QR code redeemed");
    } else {
        tracing::debug!(user_id, "QR code rejected");
    }

    Ok(redeemed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{CreatedAtPolicy, RedemptionMode},
        models::qr_code::{QrCode, TokenStatus},
        store::MemoryQrStore,
    };

    fn store() -> MemoryQrStore {
        MemoryQrStore::new(CreatedAtPolicy::Preserve, RedemptionMode::Mark)
    }

    #[test]
    fn user_id_validation() {
        assert!(validate_user_id("alice").is_ok());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("ali:ce").is_err());
        assert!(validate_user_id(&"a".repeat(MAX_USER_ID_LENGTH)).is_ok());
        assert!(validate_user_id(&"a".repeat(MAX_USER_ID_LENGTH + 1)).is_err());
    }

    #[test]
    fn user_id_with_nul_is_rejected() {
        assert!(matches!(
            validate_user_id("al\0ice"),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn issue_stores_token_and_returns_png() {
        let store = store();
        let png = issue_qr_code(&store, "alice", 256).await.unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);

        let row = store.get("alice").await.unwrap();
        assert_eq!(row.random_string.len(), crate::token::TOKEN_LENGTH);
        assert_eq!(row.status, TokenStatus::Unredeemed);
    }

    #[tokio::test]
    async fn invalid_user_id_is_not_stored() {
        let store = store();
        let err = issue_qr_code(&store, "a:b", 256).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert!(matches!(store.get("a:b").await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn redeem_issued_payload_once() {
        let store = store();
        issue_qr_code(&store, "alice", 256).await.unwrap();
        let token = store.get("alice").await.unwrap().random_string;
        let payload = format_payload("alice", &token);

        assert!(redeem_qr_code(&store, &payload).await.unwrap());
        assert!(!redeem_qr_code(&store, &payload).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_payloads_are_invalid_not_errors() {
        let store = store();
        assert!(!redeem_qr_code(&store, "no-delimiter").await.unwrap());
        assert!(!redeem_qr_code(&store, "a:b:c").await.unwrap());
    }

    /// Fails the test if the store is ever reached.
    struct UnreachableStore;

    #[async_trait::async_trait]
    impl QrStore for UnreachableStore {
        async fn upsert(&self, _: &str, _: &str) -> Result<QrCode, AppError> {
            panic!("store must not be called")
        }

        async fn get(&self, _: &str) -> Result<QrCode, AppError> {
            panic!("store must not be called")
        }

        async fn verify_and_consume(&self, _: &str, _: &str) -> Result<bool, AppError> {
            panic!("store must not be called")
        }

        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn payload_with_nul_is_invalid_without_store_access() {
        assert!(!redeem_qr_code(&UnreachableStore, "al\0ice:abc").await.unwrap());
        assert!(!redeem_qr_code(&UnreachableStore, "alice:ab\0c").await.unwrap());
    }

    #[tokio::test]
    async fn issue_with_nul_is_rejected_without_store_access() {
        let err = issue_qr_code(&UnreachableStore, "al\0ice", 256)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn empty_payload_is_a_validation_error() {
        let err = redeem_qr_code(&store(), "").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }
}
