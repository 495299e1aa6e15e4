//! Like state and like/unlike for one work.
//!
//! The presence of the caller's `like` interaction row decides the state;
//! the counter on the work row follows it.

use axum::extract::{Path, State};
use axum::Json;
use booksummary_core::interaction::{InteractionKind, LikeState, RecordOutcome, WorkCounters};
use booksummary_core::types::DbId;
use booksummary_db::models::work::Work;
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::works::visible_work;
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::realtime::publish_counters;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LikeStatus {
    pub work_id: DbId,
    pub liked: bool,
    pub like_count: i64,
    pub view_count: i64,
}

impl LikeStatus {
    fn new(counters: WorkCounters, liked: bool) -> Self {
        Self {
            work_id: counters.work_id,
            liked,
            like_count: counters.like_count,
            view_count: counters.view_count,
        }
    }
}

/// GET /api/v1/works/{id}/like
///
/// Anonymous callers get `liked: false`. Private works answer 404 to
/// anyone but the owner and admins.
pub async fn get_like(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth: OptionalAuthUser,
) -> AppResult<Json<DataResponse<LikeStatus>>> {
    let work = visible_work(&state, id, auth.caller()).await?;
    let like_state = state.recorder.like_state(id, auth.user_id()).await?;

    Ok(Json(DataResponse {
        data: LikeStatus::new(work.counters(), like_state == LikeState::Liked),
    }))
}

/// POST /api/v1/works/{id}/like
///
/// Liking twice is a no-op. Anonymous callers get 401 with a `login_url`.
pub async fn like(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<LikeStatus>>> {
    let work = visible_work(&state, id, Some((user.user_id, user.role.as_str()))).await?;
    let outcome = state
        .recorder
        .record(id, Some(user.user_id), InteractionKind::Like)
        .await?;
    finish(&state, &work, outcome).await
}

/// DELETE /api/v1/works/{id}/like
pub async fn unlike(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<LikeStatus>>> {
    let work = visible_work(&state, id, Some((user.user_id, user.role.as_str()))).await?;
    let outcome = state
        .recorder
        .remove(id, Some(user.user_id), InteractionKind::Like)
        .await?;
    finish(&state, &work, outcome).await
}

async fn finish(
    state: &AppState,
    work: &Work,
    outcome: RecordOutcome,
) -> AppResult<Json<DataResponse<LikeStatus>>> {
    if outcome.changed {
        tracing::info!(
            work_id = work.id,
            liked = outcome.active,
            like_count = outcome.counters.like_count,
            "Like state changed"
        );
        publish_counters(state, outcome.counters, work.into()).await;
    }

    Ok(Json(DataResponse {
        data: LikeStatus::new(outcome.counters, outcome.active),
    }))
}
