//! Repository for `operator_sessions`.

use rocketlab_core::types::{DbId, SessionId, Timestamp};
use sqlx::PgPool;

use crate::models::operator::Operator;
use crate::models::session::OperatorSession;

pub struct SessionRepo;

impl SessionRepo {
    /// Start a session for `operator_id` lasting until `expires_at`.
    pub async fn open(
        pool: &PgPool,
        operator_id: DbId,
        expires_at: Timestamp,
    ) -> Result<OperatorSession, sqlx::Error> {
        sqlx::query_as::<_, OperatorSession>(
            "INSERT INTO operator_sessions (operator_id, expires_at)
             VALUES ($1, $2)
             RETURNING id, operator_id, expires_at, ended_at, created_at",
        )
        .bind(operator_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// The operator behind a session, provided the session has neither ended
    /// nor expired and the operator is still active.
    pub async fn live_operator(
        pool: &PgPool,
        id: SessionId,
    ) -> Result<Option<Operator>, sqlx::Error> {
        sqlx::query_as::<_, Operator>(
            "SELECT o.id, o.username, o.password_hash, o.role, o.is_active,
                    o.last_sign_in_at, o.created_at, o.updated_at
             FROM operator_sessions s
             JOIN operators o ON o.id = s.operator_id
             WHERE s.id = $1
               AND s.ended_at IS NULL
               AND s.expires_at > NOW()
               AND o.is_active",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// End a session. Returns `false` if it was already ended or never existed.
    pub async fn end(pool: &PgPool, id: SessionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE operator_sessions SET ended_at = NOW()
             WHERE id = $1 AND ended_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
