//! [`LeadStore`] backed directly by Postgres.

use async_trait::async_trait;
use rocketlab_core::error::RemoteError;
use rocketlab_core::lead::{Lead, LeadStatus, NewLead};
use rocketlab_core::store::LeadStore;
use rocketlab_core::types::LeadId;

use crate::repositories::LeadRepo;
use crate::DbPool;

/// Runs the flows straight against the database, e.g. from server-side jobs.
#[derive(Clone)]
pub struct PgLeadStore {
    pool: DbPool,
}

impl PgLeadStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn remote(err: sqlx::Error) -> RemoteError {
    tracing::error!(error = %err, "Lead store query failed");
    RemoteError::new(err.to_string())
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn insert(&self, lead: &NewLead) -> Result<(), RemoteError> {
        LeadRepo::create(&self.pool, lead).await.map_err(remote)?;
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<Lead>, RemoteError> {
        LeadRepo::list_newest_first(&self.pool).await.map_err(remote)
    }

    async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<(), RemoteError> {
        match LeadRepo::update_status(&self.pool, id, status).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(RemoteError::new(format!("lead {id} not found"))),
            Err(err) => Err(remote(err)),
        }
    }
}
