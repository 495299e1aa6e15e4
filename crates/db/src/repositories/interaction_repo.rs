//! Repository for the `interactions` table and the counter functions.

use async_trait::async_trait;
use booksummary_core::interaction::{CounterDelta, InteractionKind, InteractionStore, WorkCounters};
use booksummary_core::types::DbId;
use sqlx::PgPool;

use crate::models::interaction::Interaction;
use crate::models::work::CounterRow;
use crate::repositories::WorkRepo;

const COLUMNS: &str = "id, work_id, user_id, interaction_type, created_at";

pub struct InteractionRepo;

impl InteractionRepo {
    pub async fn find(
        pool: &PgPool,
        work_id: DbId,
        user_id: DbId,
        kind: InteractionKind,
    ) -> Result<Option<Interaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM interactions
             WHERE work_id = $1 AND user_id = $2 AND interaction_type = $3"
        );
        sqlx::query_as::<_, Interaction>(&query)
            .bind(work_id)
            .bind(user_id)
            .bind(kind.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Insert unless the row already exists. Returns `true` if inserted.
    pub async fn insert(
        pool: &PgPool,
        work_id: DbId,
        user_id: DbId,
        kind: InteractionKind,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO interactions (work_id, user_id, interaction_type)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_interactions_work_user_type DO NOTHING",
        )
        .bind(work_id)
        .bind(user_id)
        .bind(kind.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        work_id: DbId,
        user_id: DbId,
        kind: InteractionKind,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM interactions
             WHERE work_id = $1 AND user_id = $2 AND interaction_type = $3",
        )
        .bind(work_id)
        .bind(user_id)
        .bind(kind.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_for_work(
        pool: &PgPool,
        work_id: DbId,
        kind: InteractionKind,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM interactions WHERE work_id = $1 AND interaction_type = $2",
        )
        .bind(work_id)
        .bind(kind.as_str())
        .fetch_one(pool)
        .await
    }

    /// Call `increment_*_count` / `decrement_*_count` for the work.
    ///
    /// Fails with `RowNotFound` if the work does not exist.
    pub async fn adjust_counter(
        pool: &PgPool,
        work_id: DbId,
        kind: InteractionKind,
        delta: CounterDelta,
    ) -> Result<WorkCounters, sqlx::Error> {
        let function = match (kind, delta) {
            (InteractionKind::Like, CounterDelta::Increment) => "increment_like_count",
            (InteractionKind::Like, CounterDelta::Decrement) => "decrement_like_count",
            (InteractionKind::View, CounterDelta::Increment) => "increment_view_count",
            (InteractionKind::View, CounterDelta::Decrement) => "decrement_view_count",
        };
        let query = format!("SELECT id, view_count, like_count FROM {function}($1)");
        let row = sqlx::query_as::<_, CounterRow>(&query)
            .bind(work_id)
            .fetch_one(pool)
            .await?;
        Ok(row.into())
    }
}

/// [`InteractionStore`] over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionStore for PgInteractionStore {
    type Error = sqlx::Error;

    async fn counters(&self, work_id: DbId) -> Result<Option<WorkCounters>, sqlx::Error> {
        WorkRepo::counters(&self.pool, work_id).await
    }

    async fn exists(
        &self,
        work_id: DbId,
        user_id: DbId,
        kind: InteractionKind,
    ) -> Result<bool, sqlx::Error> {
        Ok(InteractionRepo::find(&self.pool, work_id, user_id, kind)
            .await?
            .is_some())
    }

    async fn insert(
        &self,
        work_id: DbId,
        user_id: DbId,
        kind: InteractionKind,
    ) -> Result<bool, sqlx::Error> {
        InteractionRepo::insert(&self.pool, work_id, user_id, kind).await
    }

    async fn delete(
        &self,
        work_id: DbId,
        user_id: DbId,
        kind: InteractionKind,
    ) -> Result<bool, sqlx::Error> {
        InteractionRepo::delete(&self.pool, work_id, user_id, kind).await
    }

    async fn adjust_counter(
        &self,
        work_id: DbId,
        kind: InteractionKind,
        delta: CounterDelta,
    ) -> Result<WorkCounters, sqlx::Error> {
        let counters = InteractionRepo::adjust_counter(&self.pool, work_id, kind, delta).await?;
        tracing::debug!(
            work_id,
            kind = kind.as_str(),
            delta = delta.as_i64(),
            like_count = counters.like_count,
            view_count = counters.view_count,
            "Counter adjusted"
        );
        Ok(counters)
    }
}
