//! Handlers for the `/works` resource: public listing, detail, and
//! owner/admin management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use booksummary_core::cover::{key_from_url, COVER_BUCKET};
use booksummary_core::error::CoreError;
use booksummary_core::interaction::InteractionKind;
use booksummary_core::roles::is_admin;
use booksummary_core::search::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use booksummary_core::types::DbId;
use booksummary_core::work::{
    blank_to_none, can_view, ensure_can_manage, genre_filter, normalize_themes, validate_title,
    WorkStatus, NO_RESULTS_MESSAGE,
};
use booksummary_db::models::work::{
    CreateWork, GenreCount, UpdateWork, Work, WorkSummary, WorkWithAuthor,
};
use booksummary_db::repositories::{LibraryRepo, WorkRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::query::WorkListParams;
use crate::realtime::{
    publish_counters, publish_library_stats, publish_work_hidden, publish_work_row,
};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct WorkListResponse {
    pub items: Vec<WorkSummary>,
    /// Rows matching the current filter.
    pub total: i64,
    /// Public works per genre, for the filter tabs.
    pub genre_counts: Vec<GenreCount>,
    /// Public works across every genre.
    pub total_all: i64,
    /// Set when `items` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl WorkListResponse {
    pub fn new(items: Vec<WorkSummary>, total: i64, genre_counts: Vec<GenreCount>) -> Self {
        let total_all = genre_counts.iter().map(|g| g.count).sum();
        let message = items.is_empty().then_some(NO_RESULTS_MESSAGE);
        Self {
            items,
            total,
            genre_counts,
            total_all,
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkRequest {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub prompt: Option<String>,
    pub original_text: Option<String>,
    pub variation_prompt: Option<String>,
    pub variation_text: Option<String>,
    pub genre: Option<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub status: WorkStatus,
    /// Defaults to the caller's library.
    pub library_id: Option<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorkRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub prompt: Option<String>,
    pub original_text: Option<String>,
    pub variation_prompt: Option<String>,
    pub variation_text: Option<String>,
    pub genre: Option<String>,
    pub themes: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub status: Option<WorkStatus>,
    pub library_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/works
///
/// Public works only, filtered by `genre` (`all` disables the filter) and
/// ordered by `sort` (`recent`, `views`, `likes`).
pub async fn list_works(
    State(state): State<AppState>,
    Query(params): Query<WorkListParams>,
) -> AppResult<Json<DataResponse<WorkListResponse>>> {
    let genre = genre_filter(params.genre.as_deref());
    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = WorkRepo::list_public(&state.pool, genre, params.sort, limit, offset).await?;
    let total = WorkRepo::count_public(&state.pool, genre).await?;
    let genre_counts = WorkRepo::public_genre_counts(&state.pool).await?;

    Ok(Json(DataResponse {
        data: WorkListResponse::new(items, total, genre_counts),
    }))
}

/// GET /api/v1/works/{id}
///
/// Signed-in readers record a view the first time they open a work.
pub async fn get_work(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth: OptionalAuthUser,
) -> AppResult<Json<DataResponse<WorkWithAuthor>>> {
    let mut detail = WorkRepo::find_with_author(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;

    if !can_view(detail.work.is_public, detail.work.user_id, auth.caller()) {
        return Err(not_found(id));
    }

    if let Some(user_id) = auth.user_id() {
        match state
            .recorder
            .record(id, Some(user_id), InteractionKind::View)
            .await
        {
            Ok(outcome) if outcome.changed => {
                detail.work.view_count = outcome.counters.view_count;
                detail.work.like_count = outcome.counters.like_count;
                publish_counters(&state, outcome.counters, (&detail.work).into()).await;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, work_id = id, user_id, "Failed to record view"),
        }
    }

    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/works
pub async fn create_work(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateWorkRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Work>>)> {
    let title = validate_title(&input.title)?;
    let themes = normalize_themes(&input.themes)?;

    let library_id = match input.library_id {
        Some(library_id) => {
            ensure_library_access(&state, library_id, &user).await?;
            library_id
        }
        None => LibraryRepo::get_or_create(&state.pool, user.user_id).await?.id,
    };

    let create = CreateWork {
        title,
        description: blank_to_none(input.description),
        content: blank_to_none(input.content),
        prompt: blank_to_none(input.prompt),
        original_text: blank_to_none(input.original_text),
        variation_prompt: blank_to_none(input.variation_prompt),
        variation_text: blank_to_none(input.variation_text),
        genre: blank_to_none(input.genre).map(|g| g.trim().to_string()),
        themes,
        is_public: input.is_public,
        status: input.status.as_str().to_string(),
        library_id: Some(library_id),
        user_id: Some(user.user_id),
    };

    let work = WorkRepo::create(&state.pool, &create).await?;
    tracing::info!(work_id = work.id, user_id = user.user_id, "Work created");

    publish_library_stats(&state, library_id).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: work })))
}

/// PUT /api/v1/works/{id}
pub async fn update_work(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkRequest>,
) -> AppResult<Json<DataResponse<Work>>> {
    let existing = WorkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    ensure_can_manage(existing.user_id, user.user_id, &user.role)?;

    let title = input.title.as_deref().map(validate_title).transpose()?;
    let themes = input
        .themes
        .as_deref()
        .map(normalize_themes)
        .transpose()?;
    if let Some(library_id) = input.library_id {
        ensure_library_access(&state, library_id, &user).await?;
    }

    let update = UpdateWork {
        title,
        description: input.description,
        content: input.content,
        prompt: input.prompt,
        original_text: input.original_text,
        variation_prompt: input.variation_prompt,
        variation_text: input.variation_text,
        genre: input.genre.map(|g| g.trim().to_string()),
        themes,
        is_public: input.is_public,
        status: input.status.map(|s| s.as_str().to_string()),
        library_id: input.library_id,
    };

    let work = WorkRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(not_found(id))?;
    tracing::info!(work_id = id, user_id = user.user_id, "Work updated");

    if existing.is_public && !work.is_public {
        publish_work_hidden(&state, id);
    }
    publish_work_row(&state, &work);
    if existing.library_id != work.library_id || existing.is_public != work.is_public {
        if let Some(old) = existing.library_id {
            publish_library_stats(&state, old).await;
        }
        if let Some(new) = work.library_id {
            publish_library_stats(&state, new).await;
        }
    }

    Ok(Json(DataResponse { data: work }))
}

/// DELETE /api/v1/works/{id}
///
/// Comments and interactions go with the row. A stored cover is removed
/// afterwards; failing to remove it is logged only.
pub async fn delete_work(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let work = WorkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    ensure_can_manage(work.user_id, user.user_id, &user.role)?;

    if !WorkRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(work_id = id, user_id = user.user_id, "Work deleted");

    if let Some(key) = work.cover_url.as_deref().and_then(key_from_url) {
        if let Err(e) = state.storage.delete(COVER_BUCKET, key).await {
            tracing::warn!(error = %e, work_id = id, key, "Failed to delete cover");
        }
    }
    if let Some(library_id) = work.library_id {
        publish_library_stats(&state, library_id).await;
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Work", id })
}

/// The work if `caller` may see it, otherwise the same 404 as a missing id.
pub(crate) async fn visible_work(
    state: &AppState,
    id: DbId,
    caller: Option<(DbId, &str)>,
) -> AppResult<Work> {
    let work = WorkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    if !can_view(work.is_public, work.user_id, caller) {
        return Err(not_found(id));
    }
    Ok(work)
}

/// Works may only be filed under the caller's own library (admins excepted).
async fn ensure_library_access(
    state: &AppState,
    library_id: DbId,
    user: &AuthUser,
) -> AppResult<()> {
    let library = LibraryRepo::find_by_id(&state.pool, library_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Library",
            id: library_id,
        }))?;
    if library.user_id != user.user_id && !is_admin(&user.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "다른 사용자의 도서관에는 작품을 등록할 수 없습니다.".into(),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: DbId) -> WorkSummary {
        let now = chrono::Utc::now();
        WorkSummary {
            id,
            title: "달빛 서점".into(),
            description: None,
            genre: Some("판타지".into()),
            themes: vec![],
            is_public: true,
            status: "completed".into(),
            view_count: 0,
            like_count: 0,
            cover_url: None,
            library_id: None,
            user_id: None,
            author_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn counts() -> Vec<GenreCount> {
        vec![
            GenreCount {
                genre: Some("판타지".into()),
                count: 3,
            },
            GenreCount {
                genre: None,
                count: 2,
            },
        ]
    }

    #[test]
    fn empty_page_carries_no_results_message() {
        let response = WorkListResponse::new(vec![], 0, counts());

        assert_eq!(response.message, Some("해당 카테고리의 작품이 없습니다."));
        assert_eq!(response.total_all, 5);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "해당 카테고리의 작품이 없습니다.");
    }

    #[test]
    fn non_empty_page_omits_message() {
        let response = WorkListResponse::new(vec![summary(1)], 1, counts());

        assert_eq!(response.message, None);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["total"], 1);
    }
}
