use crate::models::post::{BulkPostRow, PostDetailRow};
use crate::models::PostRecord;
use sqlx::PgPool;
use uuid::Uuid;

/// Partial post update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
}

/// Create a new post
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    title: &str,
    content: &str,
    url: Option<&str>,
) -> Result<PostRecord, sqlx::Error> {
    sqlx::query_as::<_, PostRecord>(
        r#"
        INSERT INTO posts (id, author_id, title, content, url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, author_id, title, content, url, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(author_id)
    .bind(title)
    .bind(content)
    .bind(url)
    .fetch_one(pool)
    .await
}

/// Get a post by ID
pub async fn find_post(pool: &PgPool, post_id: Uuid) -> Result<Option<PostRecord>, sqlx::Error> {
    sqlx::query_as::<_, PostRecord>(
        r#"
        SELECT id, author_id, title, content, url, created_at, updated_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

pub async fn post_exists(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
        .bind(post_id)
        .fetch_one(pool)
        .await
}

/// Post with author summary and live like/comment counts
pub async fn find_post_detail(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, PostDetailRow>(
        r#"
        SELECT p.id, p.author_id, p.title, p.content, p.url, p.created_at, p.updated_at,
               u.name AS author_name,
               u.profile_picture AS author_profile_picture,
               (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
               (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
        FROM posts p
        JOIN users u ON u.id = p.author_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Newest posts first, with author names
pub async fn list_posts(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<BulkPostRow>, sqlx::Error> {
    sqlx::query_as::<_, BulkPostRow>(
        r#"
        SELECT p.id, p.title, p.content, p.url, p.created_at,
               u.name AS author_name
        FROM posts p
        JOIN users u ON u.id = p.author_id
        ORDER BY p.created_at DESC, p.id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Update a post owned by `author_id`; `None` when no such post is owned
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    changes: &PostChanges,
) -> Result<Option<PostRecord>, sqlx::Error> {
    sqlx::query_as::<_, PostRecord>(
        r#"
        UPDATE posts
        SET title = COALESCE($3, title),
            content = COALESCE($4, content),
            url = COALESCE($5, url),
            updated_at = NOW()
        WHERE id = $1 AND author_id = $2
        RETURNING id, author_id, title, content, url, created_at, updated_at
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .bind(&changes.title)
    .bind(&changes.content)
    .bind(&changes.url)
    .fetch_optional(pool)
    .await
}

/// Delete a post owned by `author_id`; likes, comments and bookmarks cascade
pub async fn delete_post(pool: &PgPool, post_id: Uuid, author_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
        .bind(post_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
