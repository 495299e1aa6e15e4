//! Repository for the `profiles` table.

use booksummary_core::account::UserSortField;
use booksummary_core::search::PageWindow;
use booksummary_core::types::DbId;
use booksummary_core::work::SortOrder;
use sqlx::PgPool;

use crate::models::profile::{CreateProfile, Profile, UpdateProfile};

const COLUMNS: &str = "id, email, password_hash, full_name, bio, role, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a profile with the default role. Fails with a unique violation
    /// on `uq_profiles_email` if the email is taken.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (email, password_hash, full_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.full_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive email lookup.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        field: UserSortField,
        order: SortOrder,
        window: PageWindow,
    ) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles
             ORDER BY {} {} NULLS LAST, id {}
             LIMIT $1 OFFSET $2",
            field.column(),
            order.keyword(),
            order.keyword(),
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                full_name = COALESCE($2, full_name),
                bio = COALESCE($3, bio),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.bio)
            .fetch_optional(pool)
            .await
    }
}
