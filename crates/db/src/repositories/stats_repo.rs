//! Aggregate counts for the admin dashboard.

use sqlx::PgPool;

use crate::models::stats::DashboardCounts;

pub struct StatsRepo;

impl StatsRepo {
    pub async fn dashboard_counts(pool: &PgPool) -> Result<DashboardCounts, sqlx::Error> {
        sqlx::query_as::<_, DashboardCounts>(
            "SELECT
                (SELECT COUNT(*) FROM ai_works)     AS total_works,
                (SELECT COUNT(*) FROM profiles)     AS total_users,
                (SELECT COUNT(*) FROM comments)     AS total_comments,
                (SELECT COUNT(*) FROM interactions) AS total_interactions",
        )
        .fetch_one(pool)
        .await
    }
}
