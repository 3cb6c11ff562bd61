/// Post handlers - HTTP endpoints for post operations
use crate::db::post_repo::{self, PostChanges};
use crate::error::{AppError, Result};
use crate::models::post::PostDetail;
use crate::models::{BulkPost, PostRecord};
use crate::validators::{non_empty, validate, CreateBlogInput, UpdateBlogInput};
use actix_middleware::{MaybeUserId, UserId};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamp to `1..=MAX_PAGE_SIZE` and a non-negative offset
    pub fn bounds(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BulkResponse {
    pub posts: Vec<BulkPost>,
}

/// Load a post and check the caller wrote it: 404 when absent, 403 otherwise
async fn owned_post(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<PostRecord> {
    let post = post_repo::find_post(pool, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author_id != user_id {
        tracing::warn!(user_id = %user_id, post_id = %post_id, "Rejected edit by non-author");
        return Err(AppError::Forbidden(
            "You can only modify your own posts".to_string(),
        ));
    }

    Ok(post)
}

/// Create a new post
pub async fn create_blog(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreateBlogInput>,
) -> Result<HttpResponse> {
    validate(&*req)?;

    let post = post_repo::create_post(
        &pool,
        user_id.0,
        req.title.trim(),
        &req.content,
        non_empty(&req.url),
    )
    .await?;

    tracing::info!(user_id = %user_id.0, post_id = %post.id, "Post created");
    Ok(HttpResponse::Created().json(IdResponse { id: post.id }))
}

/// Update title, content or url of the caller's post
pub async fn update_blog(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdateBlogInput>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    let input = req.into_inner();
    input.check()?;

    owned_post(&pool, post_id, user_id.0).await?;

    let changes = PostChanges {
        title: input.title.map(|t| t.trim().to_string()),
        content: input.content,
        url: non_empty(&input.url).map(str::to_string),
    };

    // Deleted between the ownership check and here
    let post = post_repo::update_post(&pool, post_id, user_id.0, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    tracing::info!(user_id = %user_id.0, post_id = %post.id, "Post updated");
    Ok(HttpResponse::Ok().json(IdResponse { id: post.id }))
}

pub async fn delete_blog(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post_id = post_id.into_inner();
    owned_post(&pool, post_id, user_id.0).await?;

    if !post_repo::delete_post(&pool, post_id, user_id.0).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    tracing::info!(user_id = %user_id.0, post_id = %post_id, "Post deleted");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post deleted successfully",
    })))
}

/// Public feed, newest first
pub async fn bulk(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let (limit, offset) = query.bounds();

    let posts = post_repo::list_posts(&pool, limit, offset)
        .await?
        .into_iter()
        .map(BulkPost::from)
        .collect();

    Ok(HttpResponse::Ok().json(BulkResponse { posts }))
}

/// Single post; `editButton` is set when the (optional) caller is the author
pub async fn get_blog(
    pool: web::Data<PgPool>,
    viewer: MaybeUserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let row = post_repo::find_post_detail(&pool, post_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(PostDetail::from_row(row, viewer.0)))
}
