//! `comments` rows.

use booksummary_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub work_id: DbId,
    pub user_id: Option<DbId>,
    pub content: String,
    pub created_at: Timestamp,
}

/// Comment joined with its author's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub work_id: DbId,
    pub user_id: Option<DbId>,
    pub content: String,
    pub created_at: Timestamp,
    pub author_name: Option<String>,
}
