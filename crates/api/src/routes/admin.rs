//! Route definitions for operator triage. Every handler requires the admin role.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET   /leads               -> list_leads (?search=&status=)
/// GET   /leads/stats         -> lead_stats
/// PATCH /leads/{id}/status   -> update_lead_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leads", get(leads::list_leads))
        .route("/leads/stats", get(leads::lead_stats))
        .route("/leads/{id}/status", patch(leads::update_lead_status))
}
