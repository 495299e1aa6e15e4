//! Work (`ai_works`) rules: status, genres, list ordering, themes, and
//! visibility/ownership checks.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::is_admin;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a work title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum number of themes attached to a single work.
pub const MAX_THEMES: usize = 20;

/// Genre filter value meaning "no filter".
pub const GENRE_ALL: &str = "all";

/// Message shown when a listing has no rows.
pub const NO_RESULTS_MESSAGE: &str = "해당 카테고리의 작품이 없습니다.";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Publication status of a work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    #[default]
    Draft,
    Published,
}

impl WorkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkStatus::Draft => "draft",
            WorkStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "draft" => Ok(WorkStatus::Draft),
            "published" => Ok(WorkStatus::Published),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: draft, published"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering and ordering
// ---------------------------------------------------------------------------

/// Resolve a `?genre=` query value. `None`, empty and `"all"` disable the filter.
pub fn genre_filter(value: Option<&str>) -> Option<&str> {
    match value.map(str::trim) {
        None | Some("") | Some(GENRE_ALL) => None,
        Some(g) => Some(g),
    }
}

/// Ordering of the public works listing (`?sort=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicSort {
    /// Most recently updated first.
    #[default]
    Recent,
    /// Highest view count first.
    Views,
    /// Highest like count first.
    Likes,
}

impl PublicSort {
    /// `ORDER BY` clause. The id tiebreaker keeps paging stable.
    pub fn order_by(self) -> &'static str {
        match self {
            PublicSort::Recent => "w.updated_at DESC, w.id DESC",
            PublicSort::Views => "w.view_count DESC, w.id DESC",
            PublicSort::Likes => "w.like_count DESC, w.id DESC",
        }
    }
}

/// Sortable columns on the admin works screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminSortField {
    Title,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl AdminSortField {
    pub fn column(self) -> &'static str {
        match self {
            AdminSortField::Title => "w.title",
            AdminSortField::CreatedAt => "w.created_at",
            AdminSortField::UpdatedAt => "w.updated_at",
        }
    }
}

/// Sort direction for admin tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate and trim a work title.
pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("제목을 입력해주세요.".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize the ordered theme list: trim entries, drop blanks, and drop
/// later duplicates so the first occurrence keeps its position.
pub fn normalize_themes(themes: &[String]) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(themes.len());
    for theme in themes {
        let t = theme.trim();
        if t.is_empty() || out.iter().any(|existing| existing == t) {
            continue;
        }
        out.push(t.to_string());
    }
    if out.len() > MAX_THEMES {
        return Err(CoreError::Validation(format!(
            "A work may have at most {MAX_THEMES} themes"
        )));
    }
    Ok(out)
}

/// Empty optional text fields are stored as NULL.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| if v.trim().is_empty() { None } else { Some(v) })
}

// ---------------------------------------------------------------------------
// Access rules
// ---------------------------------------------------------------------------

/// Whether a caller may read a work. Private works are visible to their
/// owner and to admins only.
pub fn can_view(is_public: bool, owner_id: Option<DbId>, caller: Option<(DbId, &str)>) -> bool {
    if is_public {
        return true;
    }
    match caller {
        Some((user_id, role)) => is_admin(role) || owner_id == Some(user_id),
        None => false,
    }
}

/// Whether a caller may edit or delete a work.
pub fn ensure_can_manage(
    owner_id: Option<DbId>,
    user_id: DbId,
    role: &str,
) -> Result<(), CoreError> {
    if is_admin(role) || owner_id == Some(user_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the owner or an admin may modify this work".into(),
        ))
    }
}
