/// HTTP handlers for blog-service
pub mod blogs;
pub mod engagement;
pub mod health;
pub mod users;
