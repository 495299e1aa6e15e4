//! Novel generation proxy.

use axum::extract::State;
use axum::Json;
use booksummary_core::generation::{NovelRequest, NovelResponse};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/generate-novel
///
/// Any upstream failure is reported as `소설 생성에 실패했습니다`; the
/// cause is only logged.
pub async fn generate_novel(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<NovelRequest>,
) -> AppResult<Json<NovelResponse>> {
    input.validate()?;

    let content = state
        .generator
        .generate(&input)
        .await
        .map_err(|e| AppError::GenerationFailed(e.to_string()))?;

    tracing::info!(
        user_id = user.user_id,
        chars = content.chars().count(),
        "Novel generated"
    );
    Ok(Json(NovelResponse { content }))
}
