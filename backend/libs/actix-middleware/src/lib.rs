//! # Actix Middleware Library
//!
//! Shared middleware for the blog platform's Actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer-token guard (required / optional) and the `UserId`
//!   extractors handlers use to read the authenticated caller

pub mod jwt_auth;

pub use jwt_auth::{authenticate, AuthError, AuthMode, JwtAuth, MaybeUserId, UserId};
