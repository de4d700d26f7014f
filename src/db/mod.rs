pub mod models;
pub mod users;
pub mod sessions;
pub mod posts;

pub use models::{User, Session, Post};
pub use users::UserRepository;
pub use sessions::SessionRepository;
pub use posts::PostRepository;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::Config;
use crate::error::AppError;

/// Open the connection pool described by `config`.
///
/// In-memory databases live only as long as their connection, so they get a
/// single connection that is never recycled.
pub async fn connect(config: &Config) -> Result<Pool<Sqlite>, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if is_in_memory(&config.database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect_with(options)
            .await?
    };

    Ok(pool)
}

/// Create the `users`, `posts` and `sessions` tables if they do not exist yet.
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
pub(crate) async fn test_pool() -> Pool<Sqlite> {
    let config = Config::from_vars(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        _ => None,
    })
    .unwrap();
    let pool = connect(&config).await.unwrap();
    init_schema(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_user(pool: &Pool<Sqlite>, email: &str) -> User {
        UserRepository::create(pool, email.to_string(), None, &[1u8; 32], &[2u8; 32])
            .await
            .unwrap()
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:blog?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://postboard.db"));
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = test_pool().await;
        init_schema(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_email_violates_unique_index() {
        let pool = test_pool().await;
        make_user(&pool, "ada@example.com").await;

        let err = UserRepository::create(&pool, "ada@example.com".into(), None, &[0u8; 32], &[0u8; 32])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateUser));
    }

    #[tokio::test]
    async fn test_posts_are_scoped_to_owner() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice@example.com").await;
        let bob = make_user(&pool, "bob@example.com").await;

        let post = PostRepository::create(&pool, &alice.id, "Hello".into(), "World".into())
            .await
            .unwrap();

        assert_eq!(PostRepository::list_by_user(&pool, &alice.id).await.unwrap(), vec![post.clone()]);
        assert!(PostRepository::list_by_user(&pool, &bob.id).await.unwrap().is_empty());

        let updated = PostRepository::update(&pool, &post.id, &bob.id, Some("Hijacked".into()), None)
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(!PostRepository::delete(&pool, &post.id, &bob.id).await.unwrap());

        let stored = PostRepository::list_by_user(&pool, &alice.id).await.unwrap();
        assert_eq!(stored[0].title, "Hello");
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice@example.com").await;
        let post = PostRepository::create(&pool, &alice.id, "Title".into(), "Body".into())
            .await
            .unwrap();

        let updated = PostRepository::update(&pool, &post.id, &alice.id, None, Some("New body".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.body, "New body");
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn test_post_requires_existing_user() {
        let pool = test_pool().await;
        let result = PostRepository::create(&pool, "no-such-user", "T".into(), "B".into()).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_expired_session_is_not_returned() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice@example.com").await;

        let live = SessionRepository::create(&pool, &alice.id, 1).await.unwrap();
        let expired = SessionRepository::create(&pool, &alice.id, -1).await.unwrap();

        assert!(SessionRepository::get_by_token(&pool, &live.token).await.unwrap().is_some());
        assert!(SessionRepository::get_by_token(&pool, &expired.token).await.unwrap().is_none());

        let purged = SessionRepository::delete_expired_for_user(&pool, &alice.id).await.unwrap();
        assert_eq!(purged, 1);
    }

    #[tokio::test]
    async fn test_out_of_range_expiry_is_an_error() {
        let pool = test_pool().await;
        let alice = make_user(&pool, "alice@example.com").await;

        let err = SessionRepository::create(&pool, &alice.id, i64::MAX).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
