//! Repository for the `operators` table.

use rocketlab_core::roles::OperatorRole;
use rocketlab_core::types::DbId;
use sqlx::PgPool;

use crate::models::operator::{NewOperator, Operator};

const COLUMNS: &str = "id, username, password_hash, role, is_active, last_sign_in_at, \
                       created_at, updated_at";

pub struct OperatorRepo;

impl OperatorRepo {
    pub async fn create(pool: &PgPool, input: &NewOperator<'_>) -> Result<Operator, sqlx::Error> {
        let query = format!(
            "INSERT INTO operators (username, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Operator>(&query)
            .bind(input.username)
            .bind(input.password_hash)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Exact, case-sensitive match.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Operator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM operators WHERE username = $1");
        sqlx::query_as::<_, Operator>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Change what an operator may do. Takes effect on their next request,
    /// since every request re-reads the operator row through its session.
    ///
    /// Returns `None` if the operator does not exist.
    pub async fn set_access(
        pool: &PgPool,
        id: DbId,
        role: OperatorRole,
        is_active: bool,
    ) -> Result<Option<Operator>, sqlx::Error> {
        let query = format!(
            "UPDATE operators SET role = $2, is_active = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Operator>(&query)
            .bind(id)
            .bind(role.as_str())
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn record_sign_in(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE operators SET last_sign_in_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
