/// Blog Service Library
///
/// HTTP/JSON backend for a blogging platform: accounts, posts, likes,
/// comments and bookmarks on PostgreSQL.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: row structs and response shapes
/// - `db`: per-table repository functions
/// - `validators`: request bodies and their rules
/// - `security`: password hashing
/// - `routes`: route table and extractor configuration
/// - `error`: error types and HTTP mapping
/// - `config`: environment configuration
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod security;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};

/// Schema migrations embedded from `migrations/`
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
