//! Sign-in session row.

use rocketlab_core::types::{DbId, SessionId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct OperatorSession {
    pub id: SessionId,
    pub operator_id: DbId,
    pub expires_at: Timestamp,
    /// Set on sign-out. An ended session never comes back.
    pub ended_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
