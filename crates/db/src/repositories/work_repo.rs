//! Repository for the `ai_works` table.
//!
//! Every query aliases the table as `w` so the ordering fragments from
//! `booksummary_core::work` can be spliced in directly.

use booksummary_core::interaction::WorkCounters;
use booksummary_core::search::PageWindow;
use booksummary_core::types::DbId;
use booksummary_core::work::{AdminSortField, PublicSort, SortOrder};
use sqlx::PgPool;

use crate::models::work::{
    CounterRow, CreateWork, GenreCount, UpdateWork, Work, WorkSummary, WorkWithAuthor,
};

/// Column list shared across full-row queries.
const COLUMNS: &str = "w.id, w.title, w.description, w.content, w.prompt, w.original_text, \
                       w.variation_prompt, w.variation_text, w.genre, w.themes, w.is_public, \
                       w.status, w.view_count, w.like_count, w.dislike_count, w.cover_url, \
                       w.library_id, w.user_id, w.created_at, w.updated_at";

/// Listing columns. Expects `profiles p` joined on the owner.
const SUMMARY_COLUMNS: &str = "w.id, w.title, w.description, w.genre, w.themes, w.is_public, \
                               w.status, w.view_count, w.like_count, w.cover_url, w.library_id, \
                               w.user_id, p.full_name AS author_name, w.created_at, w.updated_at";

pub struct WorkRepo;

impl WorkRepo {
    pub async fn create(pool: &PgPool, input: &CreateWork) -> Result<Work, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_works AS w
                (title, description, content, prompt, original_text, variation_prompt,
                 variation_text, genre, themes, is_public, status, library_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Work>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content)
            .bind(&input.prompt)
            .bind(&input.original_text)
            .bind(&input.variation_prompt)
            .bind(&input.variation_text)
            .bind(&input.genre)
            .bind(&input.themes)
            .bind(input.is_public)
            .bind(&input.status)
            .bind(input.library_id)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Work>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_works w WHERE w.id = $1");
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Work plus the owner's name and bio.
    pub async fn find_with_author(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, p.full_name AS author_name, p.bio AS author_bio
             FROM ai_works w
             LEFT JOIN profiles p ON p.id = w.user_id
             WHERE w.id = $1"
        );
        sqlx::query_as::<_, WorkWithAuthor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Public works, optionally restricted to one genre.
    pub async fn list_public(
        pool: &PgPool,
        genre: Option<&str>,
        sort: PublicSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM ai_works w
             LEFT JOIN profiles p ON p.id = w.user_id
             WHERE w.is_public AND ($1::TEXT IS NULL OR w.genre = $1)
             ORDER BY {}
             LIMIT $2 OFFSET $3",
            sort.order_by()
        );
        sqlx::query_as::<_, WorkSummary>(&query)
            .bind(genre)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_public(pool: &PgPool, genre: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ai_works w
             WHERE w.is_public AND ($1::TEXT IS NULL OR w.genre = $1)",
        )
        .bind(genre)
        .fetch_one(pool)
        .await
    }

    /// Public work count per genre, largest first.
    pub async fn public_genre_counts(pool: &PgPool) -> Result<Vec<GenreCount>, sqlx::Error> {
        sqlx::query_as::<_, GenreCount>(
            "SELECT w.genre, COUNT(*) AS count
             FROM ai_works w
             WHERE w.is_public
             GROUP BY w.genre
             ORDER BY count DESC, w.genre ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Admin listing over all works regardless of visibility.
    pub async fn list_admin(
        pool: &PgPool,
        genre: Option<&str>,
        field: AdminSortField,
        order: SortOrder,
        window: PageWindow,
    ) -> Result<Vec<WorkSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM ai_works w
             LEFT JOIN profiles p ON p.id = w.user_id
             WHERE ($1::TEXT IS NULL OR w.genre = $1)
             ORDER BY {} {}, w.id {}
             LIMIT $2 OFFSET $3",
            field.column(),
            order.keyword(),
            order.keyword(),
        );
        sqlx::query_as::<_, WorkSummary>(&query)
            .bind(genre)
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_all(pool: &PgPool, genre: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM ai_works w WHERE ($1::TEXT IS NULL OR w.genre = $1)",
        )
        .bind(genre)
        .fetch_one(pool)
        .await
    }

    /// Most recently created works, for the admin dashboard.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<WorkSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM ai_works w
             LEFT JOIN profiles p ON p.id = w.user_id
             ORDER BY w.created_at DESC, w.id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, WorkSummary>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Works filed under a library, newest first. Private works are
    /// included only when `include_private` is set.
    pub async fn list_by_library(
        pool: &PgPool,
        library_id: DbId,
        include_private: bool,
    ) -> Result<Vec<WorkSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM ai_works w
             LEFT JOIN profiles p ON p.id = w.user_id
             WHERE w.library_id = $1 AND (w.is_public OR $2)
             ORDER BY w.created_at DESC, w.id DESC"
        );
        sqlx::query_as::<_, WorkSummary>(&query)
            .bind(library_id)
            .bind(include_private)
            .fetch_all(pool)
            .await
    }

    /// Apply non-`None` fields and bump `updated_at`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWork,
    ) -> Result<Option<Work>, sqlx::Error> {
        let query = format!(
            "UPDATE ai_works w SET
                title = COALESCE($2, w.title),
                description = COALESCE($3, w.description),
                content = COALESCE($4, w.content),
                prompt = COALESCE($5, w.prompt),
                original_text = COALESCE($6, w.original_text),
                variation_prompt = COALESCE($7, w.variation_prompt),
                variation_text = COALESCE($8, w.variation_text),
                genre = COALESCE($9, w.genre),
                themes = COALESCE($10, w.themes),
                is_public = COALESCE($11, w.is_public),
                status = COALESCE($12, w.status),
                library_id = COALESCE($13, w.library_id),
                updated_at = NOW()
             WHERE w.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content)
            .bind(&input.prompt)
            .bind(&input.original_text)
            .bind(&input.variation_prompt)
            .bind(&input.variation_text)
            .bind(&input.genre)
            .bind(&input.themes)
            .bind(input.is_public)
            .bind(&input.status)
            .bind(input.library_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_cover_url(
        pool: &PgPool,
        id: DbId,
        cover_url: &str,
    ) -> Result<Option<Work>, sqlx::Error> {
        let query = format!(
            "UPDATE ai_works w SET cover_url = $2, updated_at = NOW()
             WHERE w.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .bind(cover_url)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ai_works WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn counters(pool: &PgPool, id: DbId) -> Result<Option<WorkCounters>, sqlx::Error> {
        let row = sqlx::query_as::<_, CounterRow>(
            "SELECT w.id, w.view_count, w.like_count FROM ai_works w WHERE w.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Into::into))
    }

    /// Recompute both counters from the interaction rows.
    pub async fn reconcile_counters(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkCounters>, sqlx::Error> {
        let row = sqlx::query_as::<_, CounterRow>(
            "UPDATE ai_works w SET
                view_count = (SELECT COUNT(*) FROM interactions i
                              WHERE i.work_id = w.id AND i.interaction_type = 'view'),
                like_count = (SELECT COUNT(*) FROM interactions i
                              WHERE i.work_id = w.id AND i.interaction_type = 'like')
             WHERE w.id = $1
             RETURNING w.id, w.view_count, w.like_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(Into::into))
    }
}
