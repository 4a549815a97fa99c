//! Route definitions for public lead intake.

use axum::routing::post;
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// POST /    -> submit_lead
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(leads::submit_lead))
}
