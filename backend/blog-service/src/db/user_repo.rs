use crate::models::{NewUser, UserRecord, UserStats};
use sqlx::PgPool;
use uuid::Uuid;

/// Partial profile update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserInfoChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub blog_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// Insert a user; a duplicate email fails with a unique violation
pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<UserRecord, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (id, email, name, password_hash, blog_name,
                           profile_picture, cover_picture, bio, location)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, email, name, password_hash, blog_name, profile_picture,
                  cover_picture, bio, location, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(&user.blog_name)
    .bind(&user.profile_picture)
    .bind(&user.cover_picture)
    .bind(&user.bio)
    .bind(&user.location)
    .fetch_one(pool)
    .await
}

/// Find user by email (case-insensitive)
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, email, name, password_hash, blog_name, profile_picture,
               cover_picture, bio, location, created_at, updated_at
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Find user by ID
pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, email, name, password_hash, blog_name, profile_picture,
               cover_picture, bio, location, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Apply a partial profile update, returning the updated row
pub async fn update_info(
    pool: &PgPool,
    user_id: Uuid,
    changes: &UserInfoChanges,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            blog_name = COALESCE($4, blog_name),
            bio = COALESCE($5, bio),
            location = COALESCE($6, location),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, email, name, password_hash, blog_name, profile_picture,
                  cover_picture, bio, location, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&changes.name)
    .bind(&changes.email)
    .bind(&changes.blog_name)
    .bind(&changes.bio)
    .bind(&changes.location)
    .fetch_optional(pool)
    .await
}

pub async fn update_profile_picture(
    pool: &PgPool,
    user_id: Uuid,
    url: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        UPDATE users
        SET profile_picture = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, email, name, password_hash, blog_name, profile_picture,
                  cover_picture, bio, location, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(url)
    .fetch_optional(pool)
    .await
}

pub async fn update_cover_picture(
    pool: &PgPool,
    user_id: Uuid,
    url: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        UPDATE users
        SET cover_picture = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, email, name, password_hash, blog_name, profile_picture,
                  cover_picture, bio, location, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(url)
    .fetch_optional(pool)
    .await
}

/// Posts written by the user and the likes/comments those posts received
pub async fn user_stats(pool: &PgPool, user_id: Uuid) -> Result<UserStats, sqlx::Error> {
    sqlx::query_as::<_, UserStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM posts WHERE author_id = $1) AS total_posts,
            (SELECT COUNT(*)
               FROM likes l
               JOIN posts p ON p.id = l.post_id
              WHERE p.author_id = $1) AS total_likes,
            (SELECT COUNT(*)
               FROM comments c
               JOIN posts p ON p.id = c.post_id
              WHERE p.author_id = $1) AS total_comments
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}
