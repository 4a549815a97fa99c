//! Lead row model.

use rocketlab_core::lead::{ContactMethod, Lead, LeadStatus};
use rocketlab_core::types::{LeadId, Timestamp};
use sqlx::FromRow;

/// A row from the `leads` table. Enum columns are stored as TEXT and parsed on read.
#[derive(Debug, Clone, FromRow)]
pub struct LeadRow {
    pub id: LeadId,
    pub name: String,
    pub contact: String,
    #[sqlx(try_from = "String")]
    pub contact_method: ContactMethod,
    pub budget: Option<String>,
    pub project: String,
    #[sqlx(try_from = "String")]
    pub status: LeadStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Lead {
            id: row.id,
            name: row.name,
            contact: row.contact,
            contact_method: row.contact_method,
            budget: row.budget,
            project: row.project,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
