//! Admin dashboard aggregates.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct DashboardCounts {
    pub total_works: i64,
    pub total_users: i64,
    pub total_comments: i64,
    pub total_interactions: i64,
}
