//! In-memory fakes for exercising the flows without a database.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use rocketlab_core::auth_gate::{AuthProvider, AuthSnapshot, CurrentUser};
use rocketlab_core::error::RemoteError;
use rocketlab_core::lead::{ContactMethod, Lead, LeadStatus, NewLead};
use rocketlab_core::store::LeadStore;
use rocketlab_core::types::LeadId;

/// Lead store backed by a `Vec`, with switchable failures and call counters.
#[derive(Default)]
pub struct MemoryStore {
    leads: Mutex<Vec<Lead>>,
    inserted: Mutex<Vec<NewLead>>,
    pub insert_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub fail_inserts: AtomicBool,
    pub fail_lists: AtomicBool,
    pub fail_updates: AtomicBool,
    insert_delay: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_leads(leads: Vec<Lead>) -> Self {
        let store = Self::default();
        *store.leads.lock().unwrap() = leads;
        store
    }

    pub fn set_insert_delay(&self, delay: Duration) {
        *self.insert_delay.lock().unwrap() = Some(delay);
    }

    pub fn leads(&self) -> Vec<Lead> {
        self.leads.lock().unwrap().clone()
    }

    pub fn inserted(&self) -> Vec<NewLead> {
        self.inserted.lock().unwrap().clone()
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LeadStore for MemoryStore {
    async fn insert(&self, lead: &NewLead) -> Result<(), RemoteError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.insert_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(RemoteError::new("insert rejected"));
        }

        self.inserted.lock().unwrap().push(lead.clone());
        let mut leads = self.leads.lock().unwrap();
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::minutes(leads.len() as i64);
        leads.push(Lead {
            id: Uuid::new_v4(),
            name: lead.name.clone(),
            contact: lead.contact.clone(),
            contact_method: lead.contact_method,
            budget: lead.budget.clone(),
            project: lead.project.clone(),
            status: LeadStatus::New,
            created_at: created,
            updated_at: created,
        });
        Ok(())
    }

    async fn list_newest_first(&self) -> Result<Vec<Lead>, RemoteError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(RemoteError::new("select failed"));
        }
        let mut leads = self.leads();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }

    async fn update_status(&self, id: LeadId, status: LeadStatus) -> Result<(), RemoteError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(RemoteError::new("update failed"));
        }
        let mut leads = self.leads.lock().unwrap();
        if let Some(lead) = leads.iter_mut().find(|l| l.id == id) {
            lead.status = status;
        }
        Ok(())
    }
}

/// Identity provider that only records sign-outs.
#[derive(Default)]
pub struct FakeAuth {
    pub signed_out: AtomicBool,
    pub fail_sign_out: AtomicBool,
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn snapshot(&self) -> Result<AuthSnapshot, RemoteError> {
        if self.signed_out.load(Ordering::SeqCst) {
            Ok(AuthSnapshot::anonymous())
        } else {
            Ok(admin())
        }
    }

    async fn sign_out(&self) -> Result<(), RemoteError> {
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(RemoteError::new("sign-out failed"));
        }
        self.signed_out.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub fn admin() -> AuthSnapshot {
    AuthSnapshot::signed_in(
        CurrentUser {
            id: 1,
            username: "admin".into(),
            role: "admin".into(),
        },
        true,
    )
}

pub fn viewer() -> AuthSnapshot {
    AuthSnapshot::signed_in(
        CurrentUser {
            id: 2,
            username: "viewer".into(),
            role: "viewer".into(),
        },
        false,
    )
}

/// A lead created `age_hours` before a fixed reference time.
pub fn lead(n: u128, name: &str, status: LeadStatus, age_hours: i64) -> Lead {
    let created = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
        - chrono::Duration::hours(age_hours);
    Lead {
        id: Uuid::from_u128(n),
        name: name.to_string(),
        contact: format!("@{}", name.to_lowercase()),
        contact_method: ContactMethod::Telegram,
        budget: Some("12 500 ₽".to_string()),
        project: format!("Проект {n}"),
        status,
        created_at: created,
        updated_at: created,
    }
}
