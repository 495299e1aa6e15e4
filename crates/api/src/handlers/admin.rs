//! Admin-only handlers: content and user tables, dashboard, counter repair.

use axum::extract::{Path, Query, State};
use axum::Json;
use booksummary_core::interaction::WorkCounters;
use booksummary_core::search::{PageWindow, Paged, ADMIN_PAGE_SIZE};
use booksummary_core::types::DbId;
use booksummary_core::work::genre_filter;
use booksummary_db::models::profile::ProfileResponse;
use booksummary_db::models::stats::DashboardCounts;
use booksummary_db::models::work::WorkSummary;
use booksummary_db::repositories::{ProfileRepo, StatsRepo, WorkRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::works::not_found;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{AdminUserParams, AdminWorkParams};
use crate::realtime::publish_counters;
use crate::response::DataResponse;
use crate::state::AppState;

/// Works shown in the dashboard's "recent" panel.
const RECENT_WORKS_LIMIT: i64 = 10;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub counts: DashboardCounts,
    pub recent_works: Vec<WorkSummary>,
}

/// GET /api/v1/admin/works
///
/// All works, public or not, ten per page.
pub async fn list_works(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AdminWorkParams>,
) -> AppResult<Json<DataResponse<Paged<WorkSummary>>>> {
    let genre = genre_filter(params.genre.as_deref());
    let window = PageWindow::new(params.page, ADMIN_PAGE_SIZE);

    let items =
        WorkRepo::list_admin(&state.pool, genre, params.sort, params.order, window).await?;
    let total = WorkRepo::count_all(&state.pool, genre).await?;

    Ok(Json(DataResponse {
        data: Paged::new(items, total, window),
    }))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AdminUserParams>,
) -> AppResult<Json<DataResponse<Paged<ProfileResponse>>>> {
    let window = PageWindow::new(params.page, ADMIN_PAGE_SIZE);

    let profiles = ProfileRepo::list(&state.pool, params.sort, params.order, window).await?;
    let total = ProfileRepo::count(&state.pool).await?;
    let items = profiles.into_iter().map(ProfileResponse::from).collect();

    Ok(Json(DataResponse {
        data: Paged::new(items, total, window),
    }))
}

/// GET /api/v1/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let counts = StatsRepo::dashboard_counts(&state.pool).await?;
    let recent_works = WorkRepo::list_recent(&state.pool, RECENT_WORKS_LIMIT).await?;
    Ok(Json(DataResponse {
        data: Dashboard {
            counts,
            recent_works,
        },
    }))
}

/// POST /api/v1/admin/works/{id}/reconcile-counters
///
/// Recount views and likes from the interaction rows and push the result
/// to subscribers. Repairs drift left by a failed counter call.
pub async fn reconcile_counters(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkCounters>>> {
    let work = WorkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    let before = work.counters();
    let after = WorkRepo::reconcile_counters(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;

    tracing::info!(
        work_id = id,
        admin_id = admin.user_id,
        views_before = before.view_count,
        views_after = after.view_count,
        likes_before = before.like_count,
        likes_after = after.like_count,
        "Counters reconciled"
    );

    if before != after {
        publish_counters(&state, after, (&work).into()).await;
    }

    Ok(Json(DataResponse { data: after }))
}
