//! Repository for the `leads` table.

use rocketlab_core::lead::{Lead, LeadStatus, NewLead};
use rocketlab_core::types::LeadId;
use sqlx::PgPool;

use crate::models::lead::LeadRow;

const COLUMNS: &str = "id, name, contact, contact_method, budget, project, status, \
                        created_at, updated_at";

/// Insert, list and status updates for leads. Leads are never deleted.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead, returning the stored row with server-assigned fields.
    pub async fn create(pool: &PgPool, input: &NewLead) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads (name, contact, contact_method, budget, project)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LeadRow>(&query)
            .bind(&input.name)
            .bind(&input.contact)
            .bind(input.contact_method.as_str())
            .bind(&input.budget)
            .bind(&input.project)
            .fetch_one(pool)
            .await
            .map(Lead::from)
    }

    /// All leads, most recently created first.
    pub async fn list_newest_first(pool: &PgPool) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, LeadRow>(&query).fetch_all(pool).await?;
        Ok(rows.into_iter().map(Lead::from).collect())
    }

    pub async fn find_by_id(pool: &PgPool, id: LeadId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        let row = sqlx::query_as::<_, LeadRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Lead::from))
    }

    /// Set the status of one lead.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: LeadId,
        status: LeadStatus,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET status = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, LeadRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Lead::from))
    }
}
