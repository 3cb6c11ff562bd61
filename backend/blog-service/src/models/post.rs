use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct PostRecord {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Feed row: post columns plus the author's name
#[derive(Debug, Clone, FromRow)]
pub struct BulkPostRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: AuthorSummary,
}

impl From<BulkPostRow> for BulkPost {
    fn from(row: BulkPostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            url: row.url,
            created_at: row.created_at,
            author: AuthorSummary {
                name: row.author_name,
                profile_picture: None,
            },
        }
    }
}

/// Single-post row with author and live engagement counts
#[derive(Debug, Clone, FromRow)]
pub struct PostDetailRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub author_profile_picture: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub like_count: i64,
    pub comment_count: i64,
    /// True when the caller wrote the post
    pub edit_button: bool,
}

impl PostDetail {
    pub fn from_row(row: PostDetailRow, viewer: Option<Uuid>) -> Self {
        Self {
            edit_button: viewer == Some(row.author_id),
            id: row.id,
            author_id: row.author_id,
            title: row.title,
            content: row.content,
            url: row.url,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author: AuthorSummary {
                name: row.author_name,
                profile_picture: row.author_profile_picture,
            },
            like_count: row.like_count,
            comment_count: row.comment_count,
        }
    }
}

/// Bookmarked post as listed under the user's saved blogs
#[derive(Debug, Clone, FromRow)]
pub struct SavedPostRow {
    pub id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPostSummary {
    pub id: Uuid,
    pub title: String,
    pub url: Option<String>,
    pub author_id: Uuid,
    pub author: AuthorSummary,
    pub saved_at: DateTime<Utc>,
}

impl From<SavedPostRow> for SavedPostSummary {
    fn from(row: SavedPostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            url: row.url,
            author_id: row.author_id,
            author: AuthorSummary {
                name: row.author_name,
                profile_picture: None,
            },
            saved_at: row.saved_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_row(author_id: Uuid) -> PostDetailRow {
        PostDetailRow {
            id: Uuid::new_v4(),
            author_id,
            title: "Hello".to_string(),
            content: "World".to_string(),
            url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            author_name: Some("Writer".to_string()),
            author_profile_picture: None,
            like_count: 3,
            comment_count: 1,
        }
    }

    #[test]
    fn test_edit_button_only_for_author() {
        let author = Uuid::new_v4();

        assert!(PostDetail::from_row(detail_row(author), Some(author)).edit_button);
        assert!(!PostDetail::from_row(detail_row(author), Some(Uuid::new_v4())).edit_button);
        assert!(!PostDetail::from_row(detail_row(author), None).edit_button);
    }

    #[test]
    fn test_detail_serializes_camel_case() {
        let json = serde_json::to_value(PostDetail::from_row(detail_row(Uuid::new_v4()), None))
            .unwrap();
        assert_eq!(json["likeCount"], 3);
        assert_eq!(json["commentCount"], 1);
        assert_eq!(json["editButton"], false);
        assert_eq!(json["author"]["name"], "Writer");
        assert!(json["author"].get("profilePicture").is_none());
    }
}
