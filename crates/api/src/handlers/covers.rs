//! Cover image upload for a work.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use booksummary_core::cover::{
    cover_key, key_from_url, validate_cover, validate_cover_size, COVER_BUCKET,
};
use booksummary_core::types::DbId;
use booksummary_core::work::ensure_can_manage;
use booksummary_db::models::work::Work;
use booksummary_db::repositories::WorkRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::works::not_found;
use crate::middleware::auth::AuthUser;
use crate::realtime::publish_work_row;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// POST /api/v1/works/{id}/cover
///
/// The file is size-checked while it streams in and content-checked once
/// complete, before the work row or the storage backend is touched. The
/// previous cover is deleted after the new URL is saved.
pub async fn upload_cover(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Work>>> {
    let file = read_file_field(multipart).await?;
    let cover = validate_cover(
        file.file_name.as_deref(),
        file.content_type.as_deref(),
        &file.bytes,
    )?;

    let work = WorkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;
    ensure_can_manage(work.user_id, user.user_id, &user.role)?;

    let key = cover_key(id, chrono::Utc::now().timestamp_millis(), &cover.extension);
    let url = state
        .storage
        .upload(COVER_BUCKET, &key, &file.bytes, &cover.content_type)
        .await
        .map_err(|e| AppError::InternalError(format!("Cover upload failed: {e}")))?;

    let updated = WorkRepo::set_cover_url(&state.pool, id, &url)
        .await?
        .ok_or(not_found(id))?;
    tracing::info!(work_id = id, key = %key, size = file.bytes.len(), "Cover uploaded");

    if let Some(old_key) = work.cover_url.as_deref().and_then(key_from_url) {
        if old_key != key {
            if let Err(e) = state.storage.delete(COVER_BUCKET, old_key).await {
                tracing::warn!(error = %e, work_id = id, key = old_key, "Failed to delete old cover");
            }
        }
    }

    publish_work_row(&state, &updated);

    Ok(Json(DataResponse { data: updated }))
}

/// Buffer the `file` field, rejecting it as soon as it passes the size cap.
async fn read_file_field(mut multipart: Multipart) -> AppResult<UploadedFile> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            validate_cover_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}
