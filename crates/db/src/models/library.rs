//! `user_libraries` rows and DTOs.

use booksummary_core::library::LibraryStats;
use booksummary_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Library {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub theme: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Library row with its aggregate stats, as shown on the library page.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryWithStats {
    #[serde(flatten)]
    pub library: Library,
    pub total_works: i64,
    pub total_views: i64,
    pub total_likes: i64,
}

impl LibraryWithStats {
    pub fn new(library: Library, stats: LibraryStats) -> Self {
        Self {
            library,
            total_works: stats.total_works,
            total_views: stats.total_views,
            total_likes: stats.total_likes,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct LibraryStatsRow {
    pub total_works: i64,
    pub total_views: i64,
    pub total_likes: i64,
}
