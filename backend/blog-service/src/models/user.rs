use chrono::{DateTime, Utc};
/// User model
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub blog_name: Option<String>,
    pub profile_picture: Option<String>,
    pub cover_picture: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a new row; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub blog_name: Option<String>,
    pub profile_picture: Option<String>,
    pub cover_picture: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

/// Profile as returned to clients, never carries the password hash
///
/// `email` is only filled in when the caller is looking at their own profile.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub blog_name: Option<String>,
    pub profile_picture: Option<String>,
    pub cover_picture: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Full profile for the owner
    pub fn private(user: UserRecord) -> Self {
        let email = Some(user.email.clone());
        Self {
            email,
            ..Self::public(user)
        }
    }

    /// Profile as seen by other users
    pub fn public(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: None,
            blog_name: user.blog_name,
            profile_picture: user.profile_picture,
            cover_picture: user.cover_picture,
            bio: user.bio,
            location: user.location,
            created_at: user.created_at,
        }
    }
}
