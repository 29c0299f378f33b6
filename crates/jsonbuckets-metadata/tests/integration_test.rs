use std::path::PathBuf;

use jsonbuckets_core::{
    generate_api_key, hash_api_key, BucketRecord, BucketStore, CredentialStore, UserRecord,
};
use jsonbuckets_metadata::{
    create_sqlite_pool, run_migrations, SqliteBucketStore, SqliteCredentialStore,
};
use uuid::Uuid;

struct TestContext {
    credentials: SqliteCredentialStore,
    buckets: SqliteBucketStore,
}

async fn setup_context() -> TestContext {
    let db_path = temp_db_path();
    let database_url = format!("sqlite://{}", db_path.display());
    let pool = create_sqlite_pool(&database_url)
        .await
        .expect("failed to create pool");
    run_migrations(&pool).await.expect("failed migrations");

    TestContext {
        credentials: SqliteCredentialStore::new(pool.clone()),
        buckets: SqliteBucketStore::new(pool),
    }
}

fn temp_db_path() -> PathBuf {
    let filename = format!("jsonbuckets-metadata-test-{}.db", Uuid::new_v4());
    std::env::temp_dir().join(filename)
}

async fn register_user(ctx: &TestContext) -> UserRecord {
    let user = UserRecord::new(hash_api_key(&generate_api_key()));
    ctx.credentials.create(&user).await.expect("create user");
    user
}

#[tokio::test]
async fn credential_lookup_resolves_registered_key() {
    let ctx = setup_context().await;
    let key = generate_api_key();
    let user = UserRecord::new(hash_api_key(&key));
    ctx.credentials.create(&user).await.expect("create user");

    let found = ctx
        .credentials
        .find_by_key_hash(&hash_api_key(&key))
        .await
        .expect("lookup");
    assert_eq!(found, Some(user.user_id));
}

#[tokio::test]
async fn credential_lookup_misses_unknown_key() {
    let ctx = setup_context().await;
    register_user(&ctx).await;

    let found = ctx
        .credentials
        .find_by_key_hash(&hash_api_key(&generate_api_key()))
        .await
        .expect("lookup");
    assert_eq!(found, None);
}

#[tokio::test]
async fn duplicate_key_hash_is_rejected() {
    let ctx = setup_context().await;
    let hash = hash_api_key(&generate_api_key());

    ctx.credentials
        .create(&UserRecord::new(hash.clone()))
        .await
        .expect("first registration");
    let err = ctx
        .credentials
        .create(&UserRecord::new(hash))
        .await
        .expect_err("duplicate hash must be rejected");
    assert!(err.to_string().contains("already registered"));
}

#[tokio::test]
async fn insert_and_fetch_round_trips_content() {
    let ctx = setup_context().await;
    let owner = register_user(&ctx).await;

    let bucket = BucketRecord::new(owner.user_id, r#"{"a":1}"#.to_string());
    ctx.buckets.insert(&bucket).await.expect("insert");

    let content = ctx
        .buckets
        .fetch_content(bucket.bucket_id, owner.user_id)
        .await
        .expect("fetch");
    assert_eq!(content.as_deref(), Some(r#"{"a":1}"#));
}

#[tokio::test]
async fn non_owner_fetch_behaves_like_missing_bucket() {
    let ctx = setup_context().await;
    let owner = register_user(&ctx).await;
    let other = register_user(&ctx).await;

    let bucket = BucketRecord::new(owner.user_id, "42".to_string());
    ctx.buckets.insert(&bucket).await.expect("insert");

    let as_other = ctx
        .buckets
        .fetch_content(bucket.bucket_id, other.user_id)
        .await
        .expect("fetch as non-owner");
    assert_eq!(as_other, None);
}

#[tokio::test]
async fn list_returns_only_owned_buckets_in_creation_order() {
    let ctx = setup_context().await;
    let owner = register_user(&ctx).await;
    let other = register_user(&ctx).await;

    let mut first = BucketRecord::new(owner.user_id, "1".to_string());
    let mut second = BucketRecord::new(owner.user_id, "2".to_string());
    // Force distinct, ordered creation timestamps.
    second.created_at = first.created_at + chrono::Duration::seconds(1);
    second.updated_at = second.created_at;
    first.updated_at = first.created_at;
    ctx.buckets.insert(&second).await.expect("insert second");
    ctx.buckets.insert(&first).await.expect("insert first");

    let foreign = BucketRecord::new(other.user_id, "3".to_string());
    ctx.buckets.insert(&foreign).await.expect("insert foreign");

    let listed = ctx
        .buckets
        .list_by_owner(owner.user_id)
        .await
        .expect("list");
    let ids: Vec<_> = listed.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first.bucket_id, second.bucket_id]);
}

#[tokio::test]
async fn update_replaces_content_and_timestamp_atomically() {
    let ctx = setup_context().await;
    let owner = register_user(&ctx).await;

    let bucket = BucketRecord::new(owner.user_id, r#"{"v":1}"#.to_string());
    ctx.buckets.insert(&bucket).await.expect("insert");

    let later = bucket.updated_at + chrono::Duration::seconds(5);
    let matched = ctx
        .buckets
        .update_content(bucket.bucket_id, owner.user_id, r#"{"v":2}"#, later)
        .await
        .expect("update");
    assert!(matched);

    let content = ctx
        .buckets
        .fetch_content(bucket.bucket_id, owner.user_id)
        .await
        .expect("fetch");
    assert_eq!(content.as_deref(), Some(r#"{"v":2}"#));

    let listed = ctx
        .buckets
        .list_by_owner(owner.user_id)
        .await
        .expect("list");
    assert_eq!(listed[0].updated_at, later);
    assert!(listed[0].updated_at > listed[0].created_at);
}

#[tokio::test]
async fn update_by_non_owner_matches_no_rows() {
    let ctx = setup_context().await;
    let owner = register_user(&ctx).await;
    let other = register_user(&ctx).await;

    let bucket = BucketRecord::new(owner.user_id, "true".to_string());
    ctx.buckets.insert(&bucket).await.expect("insert");

    let matched = ctx
        .buckets
        .update_content(
            bucket.bucket_id,
            other.user_id,
            "false",
            chrono::Utc::now(),
        )
        .await
        .expect("update as non-owner");
    assert!(!matched);

    // Content must be untouched.
    let content = ctx
        .buckets
        .fetch_content(bucket.bucket_id, owner.user_id)
        .await
        .expect("fetch");
    assert_eq!(content.as_deref(), Some("true"));
}

#[tokio::test]
async fn delete_is_conditional_and_reports_misses() {
    let ctx = setup_context().await;
    let owner = register_user(&ctx).await;
    let other = register_user(&ctx).await;

    let bucket = BucketRecord::new(owner.user_id, "null".to_string());
    ctx.buckets.insert(&bucket).await.expect("insert");

    assert!(!ctx
        .buckets
        .delete(bucket.bucket_id, other.user_id)
        .await
        .expect("delete as non-owner"));
    assert!(ctx
        .buckets
        .delete(bucket.bucket_id, owner.user_id)
        .await
        .expect("delete as owner"));
    // Second delete of the same id reports no match.
    assert!(!ctx
        .buckets
        .delete(bucket.bucket_id, owner.user_id)
        .await
        .expect("repeat delete"));

    let gone = ctx
        .buckets
        .fetch_content(bucket.bucket_id, owner.user_id)
        .await
        .expect("fetch after delete");
    assert_eq!(gone, None);
}
