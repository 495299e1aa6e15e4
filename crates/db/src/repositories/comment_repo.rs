//! Repository for the `comments` table. Comments are never edited.

use booksummary_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentWithAuthor};

const COLUMNS: &str = "id, work_id, user_id, content, created_at";

pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        pool: &PgPool,
        work_id: DbId,
        user_id: DbId,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (work_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(work_id)
            .bind(user_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Comments on a work, newest first, with author names.
    pub async fn list_for_work(
        pool: &PgPool,
        work_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.work_id, c.user_id, c.content, c.created_at,
                    p.full_name AS author_name
             FROM comments c
             LEFT JOIN profiles p ON p.id = c.user_id
             WHERE c.work_id = $1
             ORDER BY c.created_at DESC, c.id DESC",
        )
        .bind(work_id)
        .fetch_all(pool)
        .await
    }
}
