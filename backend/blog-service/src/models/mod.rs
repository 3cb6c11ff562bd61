/// Data models for blog-service
///
/// Row structs (`*Record`, `*Row`) mirror query results and derive `FromRow`;
/// the serialized shapes returned to clients are built from them with `From`.
pub mod engagement;
pub mod post;
pub mod user;

pub use engagement::{CommentView, LikeStatus, UserStats};
pub use post::{AuthorSummary, BulkPost, PostDetail, PostRecord, SavedPostSummary};
pub use user::{NewUser, UserProfile, UserRecord};
