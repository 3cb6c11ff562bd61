/// Like, comment and bookmark handlers
use crate::db::{comment_repo, like_repo, post_repo, saved_post_repo};
use crate::error::{AppError, Result};
use crate::models::{CommentView, LikeStatus};
use crate::validators::{validate, CreateCommentInput, SaveBlogInput};
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

async fn ensure_post(pool: &PgPool, post_id: Uuid) -> Result<()> {
    if post_repo::post_exists(pool, post_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Post not found".to_string()))
    }
}

/// Like a post; liking twice is a conflict
pub async fn like_blog(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();

    // A missing post fails on the foreign key and maps to 404
    if !like_repo::create_like(&pool, post_id, user_id.0).await? {
        return Err(AppError::Conflict("Post already liked".to_string()));
    }

    let like_count = like_repo::count_likes(&pool, post_id).await?;
    tracing::debug!(user_id = %user_id.0, post_id = %post_id, like_count, "Post liked");

    Ok(HttpResponse::Created().json(LikeStatus {
        liked: true,
        like_count,
    }))
}

pub async fn unlike_blog(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();

    if !like_repo::delete_like(&pool, post_id, user_id.0).await? {
        return Err(AppError::NotFound("Like not found".to_string()));
    }

    let like_count = like_repo::count_likes(&pool, post_id).await?;
    Ok(HttpResponse::Ok().json(LikeStatus {
        liked: false,
        like_count,
    }))
}

pub async fn like_status(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    ensure_post(&pool, post_id).await?;

    let liked = like_repo::has_liked(&pool, post_id, user_id.0).await?;
    let like_count = like_repo::count_likes(&pool, post_id).await?;

    Ok(HttpResponse::Ok().json(LikeStatus { liked, like_count }))
}

pub async fn create_comment(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentInput>,
) -> Result<HttpResponse> {
    validate(&*req)?;
    let post_id = post_id.into_inner();

    let comment = comment_repo::create_comment(&pool, post_id, user_id.0, req.content.trim())
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::NotFound(_) => AppError::NotFound("Post not found".to_string()),
            other => other,
        })?;

    tracing::info!(user_id = %user_id.0, post_id = %post_id, comment_id = %comment.id, "Comment created");
    Ok(HttpResponse::Created().json(CommentView::from(comment)))
}

pub async fn list_comments(
    pool: web::Data<PgPool>,
    _user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    ensure_post(&pool, post_id).await?;

    let comments: Vec<CommentView> = comment_repo::list_comments(&pool, post_id)
        .await?
        .into_iter()
        .map(CommentView::from)
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// Bookmark a post; saving an already saved post succeeds
pub async fn save_blog(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<SaveBlogInput>,
) -> Result<HttpResponse> {
    let post_id = req.post_id;

    saved_post_repo::save_post(&pool, user_id.0, post_id)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::NotFound(_) => AppError::NotFound("Post not found".to_string()),
            other => other,
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "saved": true })))
}

/// Remove a bookmark; removing one that does not exist succeeds
pub async fn remove_saved_blog(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    let removed = saved_post_repo::remove_saved_post(&pool, user_id.0, post_id).await?;
    tracing::debug!(user_id = %user_id.0, post_id = %post_id, removed, "Bookmark removed");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "saved": false })))
}
