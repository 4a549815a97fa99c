pub mod admin;
pub mod auth;
pub mod health;
pub mod leads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /leads                          submit (public)
///
/// /auth/login                     login (public)
/// /auth/logout                    end this session (requires auth)
/// /auth/me                        current operator (requires auth)
///
/// /admin/leads                    list with search/status (admin only)
/// /admin/leads/stats              counters (admin only)
/// /admin/leads/{id}/status        change status (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/leads", leads::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
