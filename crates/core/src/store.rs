//! The contract the flows expect from the remote lead store.
//!
//! Implemented by `rocketlab_db::PgLeadStore` (direct Postgres access) and
//! `rocketlab_client::RestLeadStore` (through the HTTP service).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::lead::{Lead, LeadStatus, NewLead};
use crate::types::LeadId;

#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Insert a new lead. The store assigns id, status and timestamps.
    async fn insert(&self, lead: &NewLead) -> Result<(), RemoteError>;

    /// All leads ordered by `created_at` descending.
    async fn list_newest_first(&self) -> Result<Vec<Lead>, RemoteError>;

    /// Set `status` on the lead whose id equals `id`.
    async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<(), RemoteError>;
}

#[async_trait]
impl<S: LeadStore + ?Sized> LeadStore for Arc<S> {
    async fn insert(&self, lead: &NewLead) -> Result<(), RemoteError> {
        (**self).insert(lead).await
    }

    async fn list_newest_first(&self) -> Result<Vec<Lead>, RemoteError> {
        (**self).list_newest_first().await
    }

    async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<(), RemoteError> {
        (**self).update_status(id, status).await
    }
}
