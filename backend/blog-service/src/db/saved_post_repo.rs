use crate::models::post::SavedPostRow;
use sqlx::PgPool;
use uuid::Uuid;

/// Bookmark a post; saving twice is a no-op
pub async fn save_post(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO saved_posts (user_id, post_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, post_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Remove a bookmark; `false` when it did not exist
pub async fn remove_saved_post(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM saved_posts WHERE user_id = $1 AND post_id = $2")
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Bookmarked posts, most recently saved first
pub async fn list_saved_posts(pool: &PgPool, user_id: Uuid) -> Result<Vec<SavedPostRow>, sqlx::Error> {
    sqlx::query_as::<_, SavedPostRow>(
        r#"
        SELECT p.id, p.title, p.url, p.author_id,
               u.name AS author_name,
               s.created_at AS saved_at
        FROM saved_posts s
        JOIN posts p ON p.id = s.post_id
        JOIN users u ON u.id = p.author_id
        WHERE s.user_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
