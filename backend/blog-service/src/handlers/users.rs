/// User handlers - signup, signin and profile endpoints
use crate::db::saved_post_repo;
use crate::db::user_repo::{self, UserInfoChanges};
use crate::error::{AppError, Result};
use crate::models::{NewUser, SavedPostSummary, UserProfile};
use crate::security::password::{hash_password, verify_password};
use crate::validators::{
    non_empty, validate, DetailsQuery, SigninInput, SignupInput, UpdateCoverPictureInput,
    UpdateProfilePictureInput, UpdateUserInfoInput,
};
use actix_middleware::UserId;
use actix_web::{web, HttpResponse};
use crypto_core::jwt::JwtService;
use serde::Serialize;
use sqlx::PgPool;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const EMAIL_TAKEN: &str = "Email already in use";

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsResponse {
    pub user_data: UserProfile,
    pub is_current_user: bool,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdateResponse {
    pub success: bool,
    pub user: UserProfile,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_conflict(err: sqlx::Error) -> AppError {
    match AppError::from(err) {
        AppError::Conflict(_) => AppError::Conflict(EMAIL_TAKEN.to_string()),
        other => other,
    }
}

fn owned(value: &Option<String>) -> Option<String> {
    non_empty(value).map(str::to_string)
}

/// Create an account and return a token for it
pub async fn signup(
    pool: web::Data<PgPool>,
    jwt: web::Data<JwtService>,
    req: web::Json<SignupInput>,
) -> Result<HttpResponse> {
    let input = req.into_inner();
    validate(&input)?;

    let new_user = NewUser {
        email: normalize_email(&input.email),
        name: owned(&input.name),
        password_hash: hash_password(&input.password)?,
        blog_name: owned(&input.blog_name),
        profile_picture: owned(&input.profile_picture),
        cover_picture: owned(&input.cover_picture),
        bio: owned(&input.bio),
        location: owned(&input.location),
    };

    // The unique index on email makes this the only duplicate check needed
    let user = user_repo::create_user(&pool, &new_user)
        .await
        .map_err(email_conflict)?;

    let token = jwt.issue(user.id)?;
    tracing::info!(user_id = %user.id, "User signed up");

    Ok(HttpResponse::Created().json(TokenResponse { token }))
}

/// Exchange credentials for a token
pub async fn signin(
    pool: web::Data<PgPool>,
    jwt: web::Data<JwtService>,
    req: web::Json<SigninInput>,
) -> Result<HttpResponse> {
    let input = req.into_inner();
    validate(&input)?;

    let user = user_repo::find_by_email(&pool, &normalize_email(&input.email))
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&input.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Signin rejected: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = jwt.issue(user.id)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Own profile, or another user's public profile with `?authorId=`
pub async fn details(
    pool: web::Data<PgPool>,
    user_id: UserId,
    query: web::Query<DetailsQuery>,
) -> Result<HttpResponse> {
    let target = query.author_id.unwrap_or(user_id.0);
    let is_current_user = target == user_id.0;

    let user = user_repo::find_by_id(&pool, target)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let user_data = if is_current_user {
        UserProfile::private(user)
    } else {
        UserProfile::public(user)
    };

    Ok(HttpResponse::Ok().json(DetailsResponse {
        user_data,
        is_current_user,
    }))
}

/// Partial update of name, email, blog name, bio and location
pub async fn update_user_info(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<UpdateUserInfoInput>,
) -> Result<HttpResponse> {
    let input = req.into_inner();
    input.check()?;

    let changes = UserInfoChanges {
        name: owned(&input.name),
        email: non_empty(&input.email).map(normalize_email),
        blog_name: owned(&input.blog_name),
        bio: owned(&input.bio),
        location: owned(&input.location),
    };

    let user = user_repo::update_info(&pool, user_id.0, &changes)
        .await
        .map_err(email_conflict)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user_id.0, "Profile updated");

    Ok(HttpResponse::Ok().json(ProfileUpdateResponse {
        success: true,
        user: UserProfile::private(user),
    }))
}

pub async fn update_profile_picture(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<UpdateProfilePictureInput>,
) -> Result<HttpResponse> {
    validate(&*req)?;

    let user = user_repo::update_profile_picture(&pool, user_id.0, req.profile_picture.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileUpdateResponse {
        success: true,
        user: UserProfile::private(user),
    }))
}

pub async fn update_cover_picture(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<UpdateCoverPictureInput>,
) -> Result<HttpResponse> {
    validate(&*req)?;

    let user = user_repo::update_cover_picture(&pool, user_id.0, req.cover_picture.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ProfileUpdateResponse {
        success: true,
        user: UserProfile::private(user),
    }))
}

/// Posts the caller has bookmarked
pub async fn saved_blogs(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let saved: Vec<SavedPostSummary> = saved_post_repo::list_saved_posts(&pool, user_id.0)
        .await?
        .into_iter()
        .map(SavedPostSummary::from)
        .collect();

    Ok(HttpResponse::Ok().json(saved))
}

/// Totals over the caller's own posts
pub async fn user_stats(pool: web::Data<PgPool>, user_id: UserId) -> Result<HttpResponse> {
    let stats = user_repo::user_stats(&pool, user_id.0).await?;
    Ok(HttpResponse::Ok().json(stats))
}
