/// Database access layer
///
/// One module per table. Every function is a single SQL statement against
/// the shared `PgPool`; errors are returned as `sqlx::Error` and mapped to
/// HTTP statuses by `AppError`.
pub mod comment_repo;
pub mod like_repo;
pub mod post_repo;
pub mod saved_post_repo;
pub mod user_repo;
