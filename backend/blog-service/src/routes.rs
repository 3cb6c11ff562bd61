//! Route table
//!
//! Guarded resources carry their own `JwtAuth` wrapper, so public and
//! protected endpoints can share a scope. Within `/blog`, fixed segments are
//! registered before `/{id}` because actix matches resources in order.

use crate::error::AppError;
use crate::handlers::{blogs, engagement, health, users};
use actix_cors::Cors;
use actix_middleware::JwtAuth;
use actix_web::{error, http::header, web, HttpRequest};

/// Browsers may cache preflight results for a day
const CORS_MAX_AGE_SECS: usize = 86400;

/// Register extractor configs and every route on an `App` or scope
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(health::health_summary))
                .service(user_scope())
                .service(blog_scope()),
        );
}

fn user_scope() -> actix_web::Scope {
    web::scope("/user")
        .route("/signup", web::post().to(users::signup))
        .route("/signin", web::post().to(users::signin))
        .service(
            web::resource("/details")
                .wrap(JwtAuth::required())
                .route(web::get().to(users::details)),
        )
        .service(
            web::resource("/update-user-info")
                .wrap(JwtAuth::required())
                .route(web::put().to(users::update_user_info)),
        )
        .service(
            web::resource("/update-profile-picture")
                .wrap(JwtAuth::required())
                .route(web::put().to(users::update_profile_picture)),
        )
        .service(
            web::resource("/update-cover-picture")
                .wrap(JwtAuth::required())
                .route(web::put().to(users::update_cover_picture)),
        )
        .service(
            web::resource("/savedblogs")
                .wrap(JwtAuth::required())
                .route(web::get().to(users::saved_blogs)),
        )
        .service(
            web::resource("/user-stats")
                .wrap(JwtAuth::required())
                .route(web::get().to(users::user_stats)),
        )
}

fn blog_scope() -> actix_web::Scope {
    web::scope("/blog")
        .service(
            web::resource("")
                .wrap(JwtAuth::required())
                .route(web::post().to(blogs::create_blog)),
        )
        .route("/bulk", web::get().to(blogs::bulk))
        .service(
            web::resource("/saveblog")
                .wrap(JwtAuth::required())
                .route(web::post().to(engagement::save_blog)),
        )
        .service(
            web::resource("/editedblog/{id}")
                .wrap(JwtAuth::required())
                .route(web::put().to(blogs::update_blog)),
        )
        .service(
            web::resource("/deleteblog/{id}")
                .wrap(JwtAuth::required())
                .route(web::delete().to(blogs::delete_blog)),
        )
        .service(
            web::resource("/likestatus/{id}")
                .wrap(JwtAuth::required())
                .route(web::get().to(engagement::like_status)),
        )
        .service(
            web::resource("/removesavedblog/{id}")
                .wrap(JwtAuth::required())
                .route(web::delete().to(engagement::remove_saved_blog)),
        )
        .service(
            web::resource("/{id}/like")
                .wrap(JwtAuth::required())
                .route(web::post().to(engagement::like_blog)),
        )
        .service(
            web::resource("/{id}/likeremove")
                .wrap(JwtAuth::required())
                .route(web::delete().to(engagement::unlike_blog)),
        )
        .service(
            web::resource("/{id}/comment")
                .wrap(JwtAuth::required())
                .route(web::post().to(engagement::create_comment)),
        )
        .service(
            web::resource("/{id}/comments")
                .wrap(JwtAuth::required())
                .route(web::get().to(engagement::list_comments)),
        )
        .service(
            web::resource("/{id}")
                .wrap(JwtAuth::optional())
                .route(web::get().to(blogs::get_blog)),
        )
}

/// CORS policy for the configured origin allow-list
pub fn cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .supports_credentials()
        .max_age(CORS_MAX_AGE_SECS)
}

/// Malformed bodies get the same JSON error shape as validation failures
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            tracing::debug!(error = %err, "Rejected JSON body");
            let message = match &err {
                error::JsonPayloadError::ContentType => {
                    "Content-Type must be application/json".to_string()
                }
                other => format!("Invalid request body: {}", other),
            };
            AppError::BadRequest(message).into()
        })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|_err, _req| AppError::BadRequest("Invalid id in path".to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    })
}
