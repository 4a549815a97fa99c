//! Lead triage flow: the admin dashboard's list, search, filter and status
//! updates.
//!
//! Filtering and statistics are pure functions over the fetched list;
//! [`TriageBoard`] owns the list for one mount of the dashboard and patches it
//! in place after each confirmed status update.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auth_gate::{self, AuthProvider, GateDecision, LOGIN_PATH};
use crate::context::FlowContext;
use crate::error::{CoreError, FetchError, RemoteError, UpdateError};
use crate::lead::{Lead, LeadStatus};
use crate::store::LeadStore;
use crate::types::LeadId;

const TITLE_FETCH_FAILED: &str = "Ошибка загрузки";
const MESSAGE_FETCH_FAILED: &str = "Не удалось загрузить заявки.";
const TITLE_STATUS_UPDATED: &str = "Статус обновлен";
const MESSAGE_STATUS_UPDATED: &str = "Статус заявки успешно изменен.";
const TITLE_UPDATE_FAILED: &str = "Ошибка";
const MESSAGE_UPDATE_FAILED: &str = "Не удалось обновить статус заявки.";

// ---------------------------------------------------------------------------
// Status filter
// ---------------------------------------------------------------------------

/// Value of the dashboard's status selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(LeadStatus),
}

impl StatusFilter {
    pub const ALL_SENTINEL: &'static str = "all";

    pub fn matches(self, status: LeadStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => Self::ALL_SENTINEL,
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == Self::ALL_SENTINEL {
            Ok(StatusFilter::All)
        } else {
            LeadStatus::parse(value).map(StatusFilter::Only)
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Leads matching the status filter and, when `search` is non-empty, whose
/// name, contact or project contains it case-insensitively. Order is kept.
pub fn filter_leads<'a>(leads: &'a [Lead], search: &str, status: StatusFilter) -> Vec<&'a Lead> {
    let needle = search.to_lowercase();
    leads
        .iter()
        .filter(|lead| status.matches(lead.status))
        .filter(|lead| {
            needle.is_empty()
                || lead.name.to_lowercase().contains(&needle)
                || lead.contact.to_lowercase().contains(&needle)
                || lead.project.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Replace the status of the lead with `id`. Returns `false` when no lead matches.
pub fn patch_status(leads: &mut [Lead], id: LeadId, status: LeadStatus) -> bool {
    match leads.iter_mut().find(|lead| lead.id == id) {
        Some(lead) => {
            lead.status = status;
            true
        }
        None => false,
    }
}

/// Dashboard counters, always over the unfiltered population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: usize,
    pub new: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub rejected: usize,
}

impl LeadStats {
    pub fn from_leads(leads: &[Lead]) -> Self {
        leads.iter().fold(
            LeadStats {
                total: leads.len(),
                ..LeadStats::default()
            },
            |mut stats, lead| {
                match lead.status {
                    LeadStatus::New => stats.new += 1,
                    LeadStatus::InProgress => stats.in_progress += 1,
                    LeadStatus::Completed => stats.completed += 1,
                    LeadStatus::Rejected => stats.rejected += 1,
                }
                stats
            },
        )
    }
}

/// Fetch every lead, newest first.
pub async fn list_leads<S: LeadStore + ?Sized>(store: &S) -> Result<Vec<Lead>, FetchError> {
    Ok(store.list_newest_first().await?)
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Result of mounting the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// Auth is still resolving; nothing was fetched. Mount again later.
    Waiting,
    /// The operator is not an admin; navigate to the given path.
    Redirect(&'static str),
    Loaded { count: usize },
    /// The list could not be fetched and was left empty.
    FetchFailed,
}

/// View state of one dashboard mount.
pub struct TriageBoard<S> {
    store: S,
    leads: Vec<Lead>,
    search: String,
    status_filter: StatusFilter,
    outcome: Option<MountOutcome>,
}

impl<S: LeadStore> TriageBoard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            leads: Vec::new(),
            search: String::new(),
            status_filter: StatusFilter::All,
            outcome: None,
        }
    }

    /// Run the auth gate and, if allowed, load the lead list.
    ///
    /// The gate is decided once; later calls return the recorded outcome
    /// without fetching again. A `Waiting` result leaves the gate undecided.
    pub async fn mount(&mut self, ctx: &FlowContext<'_>) -> MountOutcome {
        if let Some(outcome) = self.outcome {
            return outcome;
        }

        let outcome = match auth_gate::evaluate(ctx.auth) {
            GateDecision::Wait => return MountOutcome::Waiting,
            GateDecision::Redirect(path) => {
                tracing::debug!(path, "Triage access denied, redirecting");
                self.leads.clear();
                MountOutcome::Redirect(path)
            }
            GateDecision::Allow => match list_leads(&self.store).await {
                Ok(leads) => {
                    tracing::debug!(count = leads.len(), "Leads loaded");
                    self.leads = leads;
                    MountOutcome::Loaded {
                        count: self.leads.len(),
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "Error fetching leads");
                    self.leads.clear();
                    ctx.error(TITLE_FETCH_FAILED, MESSAGE_FETCH_FAILED);
                    MountOutcome::FetchFailed
                }
            },
        };

        self.outcome = Some(outcome);
        outcome
    }

    /// True until the gate has been decided.
    pub fn is_loading(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<MountOutcome> {
        self.outcome
    }

    /// The full fetched list.
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    /// Leads matching the current search term and status filter.
    pub fn visible(&self) -> Vec<&Lead> {
        filter_leads(&self.leads, &self.search, self.status_filter)
    }

    pub fn stats(&self) -> LeadStats {
        LeadStats::from_leads(&self.leads)
    }

    /// Change one lead's status remotely, then patch the local copy.
    ///
    /// The local list is only touched after the store confirms the update.
    pub async fn set_status(
        &mut self,
        ctx: &FlowContext<'_>,
        id: LeadId,
        status: LeadStatus,
    ) -> Result<(), UpdateError> {
        match self.store.update_status(id, status).await {
            Ok(()) => {
                let patched = patch_status(&mut self.leads, id, status);
                tracing::info!(lead_id = %id, %status, patched, "Lead status updated");
                ctx.success(TITLE_STATUS_UPDATED, MESSAGE_STATUS_UPDATED);
                Ok(())
            }
            Err(err) => {
                tracing::error!(lead_id = %id, %status, error = %err, "Error updating lead status");
                ctx.error(TITLE_UPDATE_FAILED, MESSAGE_UPDATE_FAILED);
                Err(UpdateError(err))
            }
        }
    }

    /// Sign out through the identity provider and drop all lead data.
    ///
    /// Returns the path to navigate to.
    pub async fn sign_out<A: AuthProvider + ?Sized>(
        &mut self,
        auth: &A,
    ) -> Result<&'static str, RemoteError> {
        auth.sign_out().await?;
        self.leads.clear();
        self.search.clear();
        self.status_filter = StatusFilter::All;
        self.outcome = None;
        Ok(LOGIN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::lead::ContactMethod;

    fn lead(n: u128, name: &str, contact: &str, project: &str, status: LeadStatus) -> Lead {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() - Duration::hours(n as i64);
        Lead {
            id: Uuid::from_u128(n),
            name: name.into(),
            contact: contact.into(),
            contact_method: ContactMethod::Whatsapp,
            budget: Some("12 500 ₽".into()),
            project: project.into(),
            status,
            created_at: created,
            updated_at: created,
        }
    }

    fn sample() -> Vec<Lead> {
        vec![
            lead(1, "Иван", "@ivan", "Лендинг для кафе", LeadStatus::New),
            lead(2, "Maria", "+7 999 000 11 22", "Online store", LeadStatus::Completed),
            lead(3, "Пётр", "@petr", "Сайт-визитка", LeadStatus::New),
        ]
    }

    #[test]
    fn empty_search_and_all_returns_input_unchanged() {
        let leads = sample();
        let result: Vec<Lead> = filter_leads(&leads, "", StatusFilter::All)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(result, leads);
    }

    #[test]
    fn status_filter_keeps_relative_order() {
        let leads = sample();
        let result = filter_leads(&leads, "", StatusFilter::Only(LeadStatus::New));
        let ids: Vec<_> = result.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![leads[0].id, leads[2].id]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let leads = sample();
        assert_eq!(filter_leads(&leads, "MARIA", StatusFilter::All).len(), 1);
        assert_eq!(filter_leads(&leads, "@PETR", StatusFilter::All).len(), 1);
        assert_eq!(filter_leads(&leads, "САЙТ", StatusFilter::All).len(), 1);
        assert!(filter_leads(&leads, "nothing", StatusFilter::All).is_empty());
    }

    #[test]
    fn search_and_status_combine() {
        let leads = sample();
        let result = filter_leads(&leads, "store", StatusFilter::Only(LeadStatus::New));
        assert!(result.is_empty());
        let result = filter_leads(&leads, "иван", StatusFilter::Only(LeadStatus::New));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Иван");
    }

    #[test]
    fn patch_touches_only_the_matching_lead() {
        let before = sample();
        let mut after = before.clone();
        assert!(patch_status(&mut after, before[1].id, LeadStatus::Rejected));

        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        let mut expected = before[1].clone();
        expected.status = LeadStatus::Rejected;
        assert_eq!(after[1], expected);
    }

    #[test]
    fn patch_unknown_id_is_a_no_op() {
        let before = sample();
        let mut after = before.clone();
        assert!(!patch_status(&mut after, Uuid::from_u128(99), LeadStatus::Completed));
        assert_eq!(after, before);
    }

    #[test]
    fn stats_count_every_status() {
        let mut leads = sample();
        leads.push(lead(4, "x", "y", "z", LeadStatus::InProgress));
        leads.push(lead(5, "x", "y", "z", LeadStatus::Rejected));
        let stats = LeadStats::from_leads(&leads);
        assert_eq!(
            stats,
            LeadStats {
                total: 5,
                new: 2,
                in_progress: 1,
                completed: 1,
                rejected: 1,
            }
        );
    }

    #[test]
    fn status_filter_parses_selector_values() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "in-progress".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(LeadStatus::InProgress)
        );
        assert!("done".parse::<StatusFilter>().is_err());
    }
}
