//! Shared cryptographic helpers for the blog platform services.
//!
//! - `jwt`: issuing and verifying the bearer tokens handed out at signup/signin

pub mod jwt;

pub use jwt::{Claims, JwtService, TokenError};
