use crate::models::engagement::CommentRow;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a comment and return it joined with the writer's name and picture
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
    content: &str,
) -> Result<CommentRow, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(
        r#"
        WITH inserted AS (
            INSERT INTO comments (id, post_id, user_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, post_id, user_id, content, created_at
        )
        SELECT i.id, i.post_id, i.user_id, i.content, i.created_at,
               u.name AS user_name,
               u.profile_picture AS user_profile_picture
        FROM inserted i
        JOIN users u ON u.id = i.user_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(post_id)
    .bind(user_id)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// Comments on a post, oldest first
pub async fn list_comments(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentRow>, sqlx::Error> {
    sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT c.id, c.post_id, c.user_id, c.content, c.created_at,
               u.name AS user_name,
               u.profile_picture AS user_profile_picture
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = $1
        ORDER BY c.created_at ASC, c.id
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}
