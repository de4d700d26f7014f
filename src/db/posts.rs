use sqlx::{Pool, Sqlite};
use uuid::Uuid;
use crate::db::models::Post;
use crate::error::AppError;

/// Post storage. Every mutation is scoped by owner: a post belonging to
/// another user behaves exactly like a missing one.
pub struct PostRepository;

impl PostRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        user_id: &str,
        title: String,
        body: String,
    ) -> Result<Post, AppError> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();

        let post = sqlx::query_as::<_, Post>(
            r#"
INSERT INTO posts (id, user_id, title, body, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&title)
        .bind(&body)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    pub async fn list_by_user(
        pool: &Pool<Sqlite>,
        user_id: &str,
    ) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
SELECT * FROM posts
WHERE user_id = ?
ORDER BY created_at DESC, rowid DESC
            "#
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Fields left as `None` keep their stored value.
    pub async fn update(
        pool: &Pool<Sqlite>,
        id: &str,
        user_id: &str,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Option<Post>, AppError> {
        let now = chrono::Utc::now().timestamp();

        let post = sqlx::query_as::<_, Post>(
            r#"
UPDATE posts
SET title = COALESCE(?, title),
    body = COALESCE(?, body),
    updated_at = ?
WHERE id = ? AND user_id = ?
RETURNING *
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Returns `false` when nothing matched.
    pub async fn delete(
        pool: &Pool<Sqlite>,
        id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
