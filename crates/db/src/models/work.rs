//! `ai_works` rows and DTOs.

use booksummary_core::interaction::WorkCounters;
use booksummary_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full work row, including body text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Work {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub prompt: Option<String>,
    pub original_text: Option<String>,
    pub variation_prompt: Option<String>,
    pub variation_text: Option<String>,
    pub genre: Option<String>,
    pub themes: Vec<String>,
    pub is_public: bool,
    pub status: String,
    pub view_count: i64,
    pub like_count: i64,
    pub dislike_count: i64,
    pub cover_url: Option<String>,
    pub library_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Work {
    pub fn counters(&self) -> WorkCounters {
        WorkCounters {
            work_id: self.id,
            view_count: self.view_count,
            like_count: self.like_count,
        }
    }
}

/// Work detail with the author's public profile fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub work: Work,
    pub author_name: Option<String>,
    pub author_bio: Option<String>,
}

/// Listing row: no body text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkSummary {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub themes: Vec<String>,
    pub is_public: bool,
    pub status: String,
    pub view_count: i64,
    pub like_count: i64,
    pub cover_url: Option<String>,
    pub library_id: Option<DbId>,
    pub user_id: Option<DbId>,
    pub author_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Number of public works in one genre. `genre` is NULL for works without one.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenreCount {
    pub genre: Option<String>,
    pub count: i64,
}

/// Counter columns as returned by the counter functions.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CounterRow {
    pub id: DbId,
    pub view_count: i64,
    pub like_count: i64,
}

impl From<CounterRow> for WorkCounters {
    fn from(row: CounterRow) -> Self {
        WorkCounters {
            work_id: row.id,
            view_count: row.view_count,
            like_count: row.like_count,
        }
    }
}

/// DTO for inserting a work. Callers validate and normalize fields first.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWork {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub prompt: Option<String>,
    pub original_text: Option<String>,
    pub variation_prompt: Option<String>,
    pub variation_text: Option<String>,
    pub genre: Option<String>,
    pub themes: Vec<String>,
    pub is_public: bool,
    pub status: String,
    pub library_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

/// DTO for editing a work. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWork {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub prompt: Option<String>,
    pub original_text: Option<String>,
    pub variation_prompt: Option<String>,
    pub variation_text: Option<String>,
    pub genre: Option<String>,
    pub themes: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub status: Option<String>,
    pub library_id: Option<DbId>,
}
