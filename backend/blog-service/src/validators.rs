//! Request body shapes and their validation rules
//!
//! Each body derives `validator::Validate`; handlers call [`validate`] before
//! touching the database so that a rejected body never persists anything.

use crate::error::{AppError, FieldError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidateUrl, ValidationError};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Hardcoded pattern, checked by the tests below
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

pub const TITLE_MAX_LENGTH: u64 = 200;
pub const COMMENT_MAX_LENGTH: u64 = 2000;

/// Validate email format (RFC 5322 simplified)
pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

fn email_shape(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(error("invalid_email", "Invalid email address"))
    }
}

/// Blank counts as "not provided", anything else must be a URL
fn blank_or_url(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.trim().validate_url() {
        Ok(())
    } else {
        Err(error("url", "Must be a valid URL"))
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Must not be blank"))
    } else {
        Ok(())
    }
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Run the derived rules and convert failures into a 400 `AppError`
pub fn validate<T: Validate>(input: &T) -> Result<(), AppError> {
    input.validate().map_err(AppError::from)
}

fn require_any_field(present: bool, message: &str) -> Result<(), AppError> {
    if present {
        Ok(())
    } else {
        Err(AppError::Validation(vec![FieldError {
            field: "body".to_string(),
            message: message.to_string(),
        }]))
    }
}

/// Trim and drop empty strings, so `""` behaves like an absent field
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    #[validate(custom(function = "email_shape"))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be between 6 and 128 characters"
    ))]
    pub password: String,
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100, message = "Blog name must be at most 100 characters"))]
    pub blog_name: Option<String>,
    #[validate(custom(function = "blank_or_url"))]
    pub profile_picture: Option<String>,
    #[validate(custom(function = "blank_or_url"))]
    pub cover_picture: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SigninInput {
    #[validate(custom(function = "email_shape"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBlogInput {
    #[validate(
        length(
            min = 1,
            max = TITLE_MAX_LENGTH,
            message = "Title must be between 1 and 200 characters"
        ),
        custom(function = "not_blank")
    )]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    #[validate(url(message = "Url must be a valid URL"))]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBlogInput {
    #[validate(
        length(
            min = 1,
            max = TITLE_MAX_LENGTH,
            message = "Title must be between 1 and 200 characters"
        ),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub content: Option<String>,
    #[validate(url(message = "Url must be a valid URL"))]
    pub url: Option<String>,
}

impl UpdateBlogInput {
    /// Field rules plus "at least one field"
    pub fn check(&self) -> Result<(), AppError> {
        validate(self)?;
        require_any_field(
            self.title.is_some() || self.content.is_some() || self.url.is_some(),
            "Provide at least one of title, content or url",
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInfoInput {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
    pub email: Option<String>,
    #[validate(length(max = 100, message = "Blog name must be at most 100 characters"))]
    pub blog_name: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
}

impl UpdateUserInfoInput {
    /// Empty strings count as "not provided"; at least one field must remain
    pub fn check(&self) -> Result<(), AppError> {
        validate(self)?;

        if let Some(email) = non_empty(&self.email) {
            if !is_valid_email(email) {
                return Err(AppError::Validation(vec![FieldError {
                    field: "email".to_string(),
                    message: "Invalid email address".to_string(),
                }]));
            }
        }

        require_any_field(
            [
                &self.name,
                &self.email,
                &self.blog_name,
                &self.bio,
                &self.location,
            ]
            .into_iter()
            .any(|f| non_empty(f).is_some()),
            "No valid fields to update",
        )
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePictureInput {
    #[validate(url(message = "Profile picture must be a URL"))]
    pub profile_picture: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoverPictureInput {
    /// Older clients send `coverpicture`
    #[serde(alias = "coverpicture")]
    #[validate(url(message = "Cover picture must be a URL"))]
    pub cover_picture: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(
        length(
            min = 1,
            max = COMMENT_MAX_LENGTH,
            message = "Comment must be between 1 and 2000 characters"
        ),
        custom(function = "not_blank")
    )]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlogInput {
    pub post_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsQuery {
    pub author_id: Option<Uuid>,
}
