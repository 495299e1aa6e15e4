//! Repository for the `user_libraries` table.

use booksummary_core::library::{
    LibrarySettings, LibraryStats, DEFAULT_LIBRARY_DESCRIPTION, DEFAULT_LIBRARY_NAME,
    DEFAULT_LIBRARY_THEME,
};
use booksummary_core::types::DbId;
use sqlx::PgPool;

use crate::models::library::{Library, LibraryStatsRow};

const COLUMNS: &str = "id, user_id, name, description, is_public, theme, created_at, updated_at";

pub struct LibraryRepo;

impl LibraryRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Library>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_libraries WHERE id = $1");
        sqlx::query_as::<_, Library>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Library>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_libraries WHERE user_id = $1");
        sqlx::query_as::<_, Library>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user's library, creating the default one on first use.
    /// Concurrent first calls converge on the same row.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<Library, sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_libraries (user_id, name, description, is_public, theme)
             VALUES ($1, $2, $3, FALSE, $4)
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(DEFAULT_LIBRARY_NAME)
        .bind(DEFAULT_LIBRARY_DESCRIPTION)
        .bind(DEFAULT_LIBRARY_THEME)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM user_libraries WHERE user_id = $1");
        sqlx::query_as::<_, Library>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn update_settings(
        pool: &PgPool,
        id: DbId,
        settings: &LibrarySettings,
    ) -> Result<Option<Library>, sqlx::Error> {
        let query = format!(
            "UPDATE user_libraries SET
                name = $2,
                description = $3,
                is_public = $4,
                theme = $5,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Library>(&query)
            .bind(id)
            .bind(&settings.name)
            .bind(&settings.description)
            .bind(settings.is_public)
            .bind(&settings.theme)
            .fetch_optional(pool)
            .await
    }

    /// Totals over the works filed under the library. Private works only
    /// count when `include_private` is set.
    pub async fn stats(
        pool: &PgPool,
        id: DbId,
        include_private: bool,
    ) -> Result<LibraryStats, sqlx::Error> {
        let row = sqlx::query_as::<_, LibraryStatsRow>(
            "SELECT COUNT(*) AS total_works,
                    COALESCE(SUM(view_count), 0)::BIGINT AS total_views,
                    COALESCE(SUM(like_count), 0)::BIGINT AS total_likes
             FROM ai_works
             WHERE library_id = $1 AND (is_public OR $2)",
        )
        .bind(id)
        .bind(include_private)
        .fetch_one(pool)
        .await?;

        Ok(LibraryStats {
            library_id: id,
            total_works: row.total_works,
            total_views: row.total_views,
            total_likes: row.total_likes,
        })
    }
}
