pub mod admin;
pub mod auth;
pub mod health;
pub mod libraries;
pub mod me;
pub mod works;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                                   WebSocket (subscribe to topics)
///
/// /auth/signup                          create account (public)
/// /auth/login                           login (public)
///
/// /me                                   get, update own profile
/// /me/library                           get (created on first use), update settings
/// /me/library/works                     works in own library
///
/// /works                                public list, create
/// /works/{id}                           detail (records a view), update, delete
/// /works/{id}/like                      like state, like, unlike
/// /works/{id}/comments                  list, create
/// /works/{id}/cover                     upload cover (multipart)
///
/// /libraries/{id}                       library page with stats and works
///
/// /generate-novel                       text generation proxy (auth required)
///
/// /admin/works                          all works, paged (admin only)
/// /admin/works/{id}/reconcile-counters  recount views/likes
/// /admin/users                          users, paged
/// /admin/dashboard                      totals and recent works
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/me", me::router())
        .nest("/works", works::router())
        .nest("/libraries", libraries::router())
        .route("/generate-novel", post(handlers::generation::generate_novel))
        .nest("/admin", admin::router())
}
