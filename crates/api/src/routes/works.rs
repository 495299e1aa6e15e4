//! Route definitions for the `/works` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use booksummary_core::cover::MAX_COVER_BYTES;

use crate::handlers::{comments, covers, likes, works};
use crate::state::AppState;

/// Body limit on the cover route. Above the cover cap so oversized files
/// reach the handler and get the localized size message.
const COVER_BODY_LIMIT: usize = MAX_COVER_BYTES * 2;

/// Routes mounted at `/works`.
///
/// ```text
/// GET    /                -> list_works
/// POST   /                -> create_work
/// GET    /{id}            -> get_work
/// PUT    /{id}            -> update_work
/// DELETE /{id}            -> delete_work
/// GET    /{id}/like       -> get_like
/// POST   /{id}/like       -> like
/// DELETE /{id}/like       -> unlike
/// GET    /{id}/comments   -> list_comments
/// POST   /{id}/comments   -> create_comment
/// POST   /{id}/cover      -> upload_cover
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(works::list_works).post(works::create_work))
        .route(
            "/{id}",
            get(works::get_work)
                .put(works::update_work)
                .delete(works::delete_work),
        )
        .route(
            "/{id}/like",
            get(likes::get_like).post(likes::like).delete(likes::unlike),
        )
        .route(
            "/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/{id}/cover",
            post(covers::upload_cover).layer(DefaultBodyLimit::max(COVER_BODY_LIMIT)),
        )
}
