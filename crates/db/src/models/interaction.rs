//! `interactions` rows.

use booksummary_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Interaction {
    pub id: DbId,
    pub work_id: DbId,
    pub user_id: DbId,
    pub interaction_type: String,
    pub created_at: Timestamp,
}
