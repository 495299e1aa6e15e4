//! Route definitions for the `/admin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET  /works                            -> list_works
/// POST /works/{id}/reconcile-counters    -> reconcile_counters
/// GET  /users                            -> list_users
/// GET  /dashboard                        -> dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/works", get(admin::list_works))
        .route(
            "/works/{id}/reconcile-counters",
            post(admin::reconcile_counters),
        )
        .route("/users", get(admin::list_users))
        .route("/dashboard", get(admin::dashboard))
}
