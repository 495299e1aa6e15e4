//! Route definitions for public library pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::libraries;
use crate::state::AppState;

/// Routes mounted at `/libraries`.
///
/// ```text
/// GET /{id}  -> get_library
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(libraries::get_library))
}
