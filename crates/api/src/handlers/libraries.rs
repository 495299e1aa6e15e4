//! Handlers for the caller's library (`/me/library`) and public library
//! pages (`/libraries/{id}`).

use axum::extract::{Path, State};
use axum::Json;
use booksummary_core::error::CoreError;
use booksummary_core::library::LibrarySettings;
use booksummary_core::roles::is_admin;
use booksummary_core::types::DbId;
use booksummary_db::models::library::{Library, LibraryWithStats};
use booksummary_db::models::work::WorkSummary;
use booksummary_db::repositories::{LibraryRepo, WorkRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateLibraryRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub theme: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LibraryPage {
    pub library: LibraryWithStats,
    pub works: Vec<WorkSummary>,
}

/// GET /api/v1/me/library
///
/// Created with default settings on first access.
pub async fn get_my_library(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<LibraryWithStats>>> {
    let library = LibraryRepo::get_or_create(&state.pool, user.user_id).await?;
    let data = with_stats(&state, library, true).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/me/library
pub async fn update_my_library(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpdateLibraryRequest>,
) -> AppResult<Json<DataResponse<LibraryWithStats>>> {
    let settings = LibrarySettings::validate(
        &input.name,
        input.description.as_deref(),
        input.is_public,
        input.theme.as_deref(),
    )?;

    let library = LibraryRepo::get_or_create(&state.pool, user.user_id).await?;
    let library = LibraryRepo::update_settings(&state.pool, library.id, &settings)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Library",
            id: library.id,
        }))?;
    tracing::info!(library_id = library.id, user_id = user.user_id, "Library settings updated");

    let data = with_stats(&state, library, true).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/me/library/works
///
/// Every work in the caller's library, private ones included, newest first.
pub async fn list_my_library_works(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<WorkSummary>>>> {
    let library = LibraryRepo::get_or_create(&state.pool, user.user_id).await?;
    let works = WorkRepo::list_by_library(&state.pool, library.id, true).await?;
    Ok(Json(DataResponse { data: works }))
}

/// GET /api/v1/libraries/{id}
///
/// Private libraries are visible only to their owner and admins. Other
/// visitors see public works only.
pub async fn get_library(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth: OptionalAuthUser,
) -> AppResult<Json<DataResponse<LibraryPage>>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Library",
            id,
        })
    };

    let library = LibraryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let privileged = auth
        .caller()
        .is_some_and(|(user_id, role)| user_id == library.user_id || is_admin(role));
    if !library.is_public && !privileged {
        return Err(not_found());
    }

    let works = WorkRepo::list_by_library(&state.pool, id, privileged).await?;
    let library = with_stats(&state, library, privileged).await?;

    Ok(Json(DataResponse {
        data: LibraryPage { library, works },
    }))
}

/// Private works count toward the totals only for the owner and admins.
async fn with_stats(
    state: &AppState,
    library: Library,
    include_private: bool,
) -> AppResult<LibraryWithStats> {
    let stats = LibraryRepo::stats(&state.pool, library.id, include_private).await?;
    Ok(LibraryWithStats::new(library, stats))
}
