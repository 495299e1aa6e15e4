//! Handlers for `/works/{id}/comments`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use booksummary_core::comment::{validate_comment, ANONYMOUS_AUTHOR};
use booksummary_core::types::{DbId, Timestamp};
use booksummary_db::models::comment::{Comment, CommentWithAuthor};
use booksummary_db::repositories::CommentRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::works::visible_work;
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// A comment as shown under a work. Authors without a display name, or
/// whose profile is gone, show as `익명`.
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: DbId,
    pub work_id: DbId,
    pub user_id: Option<DbId>,
    pub content: String,
    pub author_name: String,
    pub created_at: Timestamp,
}

impl From<CommentWithAuthor> for CommentView {
    fn from(c: CommentWithAuthor) -> Self {
        Self {
            id: c.id,
            work_id: c.work_id,
            user_id: c.user_id,
            content: c.content,
            author_name: c
                .author_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
            created_at: c.created_at,
        }
    }
}

/// GET /api/v1/works/{id}/comments
///
/// Newest first. Private works answer 404 to anyone but the owner and admins.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(work_id): Path<DbId>,
    auth: OptionalAuthUser,
) -> AppResult<Json<DataResponse<Vec<CommentView>>>> {
    visible_work(&state, work_id, auth.caller()).await?;

    let comments = CommentRepo::list_for_work(&state.pool, work_id).await?;
    Ok(Json(DataResponse {
        data: comments.into_iter().map(CommentView::from).collect(),
    }))
}

/// POST /api/v1/works/{id}/comments
///
/// Content is checked before the database is touched.
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(work_id): Path<DbId>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    let content = validate_comment(&input.content)?;

    visible_work(&state, work_id, Some((user.user_id, user.role.as_str()))).await?;

    let comment = CommentRepo::create(&state.pool, work_id, user.user_id, &content).await?;
    tracing::info!(comment_id = comment.id, work_id, user_id = user.user_id, "Comment created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
