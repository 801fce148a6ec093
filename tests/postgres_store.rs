//! PostgreSQL store tests.
//!
//! These need a reachable database (configured through `DATABASE_URL` or the
//! `DB_*` variables) and are ignored by default:
//!
//! ```text
//! cargo test --test postgres_store -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use qr_redemption_server::{
    config::{Config, CreatedAtPolicy, RedemptionMode},
    db,
    error::AppError,
    models::qr_code::TokenStatus,
    store::{PgQrStore, QrStore},
    token::generate_token,
};

async fn setup(policy: CreatedAtPolicy, mode: RedemptionMode) -> PgQrStore {
    let config = Config::from_env().unwrap();
    let pool = db::create_pool(&config).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    PgQrStore::new(pool, policy, mode)
}

/// Unique per test run so reruns never collide with leftover rows.
fn user_id(prefix: &str) -> String {
    format!("{prefix}-{}", generate_token())
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn upsert_get_and_redeem_once() {
    let store = setup(CreatedAtPolicy::Preserve, RedemptionMode::Mark).await;
    let user = user_id("alice");

    store.upsert(&user, "X7fQ2mZ9pL").await.unwrap();
    let row = store.get(&user).await.unwrap();
    assert_eq!(row.random_string, "X7fQ2mZ9pL");
    assert_eq!(row.status, TokenStatus::Unredeemed);

    assert!(store.verify_and_consume(&user, "X7fQ2mZ9pL").await.unwrap());
    assert!(!store.verify_and_consume(&user, "X7fQ2mZ9pL").await.unwrap());
    assert_eq!(
        store.get(&user).await.unwrap().status,
        TokenStatus::Redeemed
    );
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn missing_user_is_not_found() {
    let store = setup(CreatedAtPolicy::Preserve, RedemptionMode::Mark).await;
    assert!(matches!(
        store.get(&user_id("ghost")).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn overwrite_respects_created_at_policy() {
    let preserve = setup(CreatedAtPolicy::Preserve, RedemptionMode::Mark).await;
    let user = user_id("preserve");
    let first = preserve.upsert(&user, "FIRSTTOKEN").await.unwrap();
    let second = preserve.upsert(&user, "SECONDTOKN").await.unwrap();
    assert_eq!(second.created_at, first.created_at);
    assert!(!preserve.verify_and_consume(&user, "FIRSTTOKEN").await.unwrap());

    let reset = setup(CreatedAtPolicy::Reset, RedemptionMode::Mark).await;
    let user = user_id("reset");
    let first = reset.upsert(&user, "FIRSTTOKEN").await.unwrap();
    let second = reset.upsert(&user, "SECONDTOKN").await.unwrap();
    assert!(second.created_at > first.created_at);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn delete_mode_removes_row() {
    let store = setup(CreatedAtPolicy::Preserve, RedemptionMode::Delete).await;
    let user = user_id("delete");

    store.upsert(&user, "X7fQ2mZ9pL").await.unwrap();
    assert!(store.verify_and_consume(&user, "X7fQ2mZ9pL").await.unwrap());
    assert!(matches!(store.get(&user).await, Err(AppError::NotFound)));
}

async fn race_redemptions(store: Arc<PgQrStore>, user: &str) -> usize {
    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let user = user.to_string();
            tokio::spawn(async move {
                store.verify_and_consume(&user, "X7fQ2mZ9pL").await.unwrap()
            })
        })
        .collect();

    let mut successes = 0;
    for attempt in attempts {
        if attempt.await.unwrap() {
            successes += 1;
        }
    }
    successes
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires a PostgreSQL database"]
async fn racing_redemptions_succeed_once() {
    let store = Arc::new(setup(CreatedAtPolicy::Preserve, RedemptionMode::Mark).await);
    let user = user_id("race");
    store.upsert(&user, "X7fQ2mZ9pL").await.unwrap();

    assert_eq!(race_redemptions(store, &user).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires a PostgreSQL database"]
async fn racing_deletions_succeed_once() {
    let store = Arc::new(setup(CreatedAtPolicy::Preserve, RedemptionMode::Delete).await);

    for _ in 0..20 {
        let user = user_id("race-delete");
        store.upsert(&user, "X7fQ2mZ9pL").await.unwrap();

        assert_eq!(race_redemptions(Arc::clone(&store), &user).await, 1);
        assert!(matches!(store.get(&user).await, Err(AppError::NotFound)));
    }
}
