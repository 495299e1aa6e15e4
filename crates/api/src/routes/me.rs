//! Route definitions for the caller's own resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::{auth, libraries};
use crate::state::AppState;

/// Routes mounted at `/me`. All require authentication.
///
/// ```text
/// GET  /                -> me
/// PUT  /                -> update_me
/// GET  /library         -> get_my_library
/// PUT  /library         -> update_my_library
/// GET  /library/works   -> list_my_library_works
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(auth::me).put(auth::update_me))
        .route(
            "/library",
            get(libraries::get_my_library).put(libraries::update_my_library),
        )
        .route("/library/works", get(libraries::list_my_library_works))
}
