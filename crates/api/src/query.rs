//! Shared query parameter types for API handlers.

use booksummary_core::account::UserSortField;
use booksummary_core::work::{AdminSortField, PublicSort, SortOrder};
use serde::Deserialize;

/// `?genre=&sort=&limit=&offset=` on the public works listing.
///
/// Limits are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct WorkListParams {
    pub genre: Option<String>,
    #[serde(default)]
    pub sort: PublicSort,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?genre=&sort=&order=&page=` on the admin works screen.
#[derive(Debug, Default, Deserialize)]
pub struct AdminWorkParams {
    pub genre: Option<String>,
    #[serde(default)]
    pub sort: AdminSortField,
    #[serde(default)]
    pub order: SortOrder,
    pub page: Option<i64>,
}

/// `?sort=&order=&page=` on the admin users screen.
#[derive(Debug, Default, Deserialize)]
pub struct AdminUserParams {
    #[serde(default)]
    pub sort: UserSortField,
    #[serde(default)]
    pub order: SortOrder,
    pub page: Option<i64>,
}
