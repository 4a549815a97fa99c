use async_trait::async_trait;
use rocketlab_core::error::RemoteError;
use rocketlab_core::lead::{Lead, LeadStatus, NewLead};
use rocketlab_core::store::LeadStore;
use rocketlab_core::types::LeadId;
use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, Envelope};

/// [`LeadStore`] over the HTTP API. Listing and status changes need an
/// admin token on the shared [`ApiClient`]; inserting does not.
#[derive(Clone)]
pub struct RestLeadStore {
    client: ApiClient,
}

#[derive(Serialize)]
struct StatusBody {
    status: LeadStatus,
}

impl RestLeadStore {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LeadStore for RestLeadStore {
    async fn insert(&self, lead: &NewLead) -> Result<(), RemoteError> {
        let _: Value = self.client.post_json("/api/v1/leads", lead).await?;
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<Lead>, RemoteError> {
        let envelope: Envelope<Vec<Lead>> = self.client.get_json("/api/v1/admin/leads").await?;
        Ok(envelope.data)
    }

    async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<(), RemoteError> {
        let path = format!("/api/v1/admin/leads/{id}/status");
        let _: Value = self
            .client
            .patch_json(&path, &StatusBody { status })
            .await?;
        Ok(())
    }
}
