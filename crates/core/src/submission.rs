//! Lead submission flow: the public contact form.
//!
//! Validates locally, inserts one lead into the store and resets the form on
//! success. Only one submission per form may be outstanding; the busy flag is
//! released when the request settles, times out, or the submit future is
//! dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::context::FlowContext;
use crate::error::{FormField, RemoteError, SubmissionError, ValidationError};
use crate::lead::{budget_label, ContactMethod, NewLead, SLIDER_DEFAULT, SLIDER_MAX};
use crate::store::LeadStore;

/// Default upper bound on a single insert request.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

const TITLE_INVALID: &str = "Ошибка";
const MESSAGE_INVALID: &str = "Пожалуйста, заполните все обязательные поля";
const TITLE_SENT: &str = "Заявка отправлена!";
const MESSAGE_SENT: &str = "Мы свяжемся с вами в течение 30 минут.";
const TITLE_FAILED: &str = "Ошибка отправки";
const MESSAGE_FAILED: &str = "Попробуйте еще раз или свяжитесь с нами напрямую.";

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Contents of the contact form as the user is editing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadForm {
    pub name: String,
    pub contact_method: ContactMethod,
    pub contact_value: String,
    /// Slider position, 0..=100 in steps of 5.
    pub budget_slider: u8,
    pub project: String,
}

impl Default for LeadForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact_method: ContactMethod::Whatsapp,
            contact_value: String::new(),
            budget_slider: SLIDER_DEFAULT,
            project: String::new(),
        }
    }
}

impl LeadForm {
    /// Check that every required field is non-empty after trimming.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<FormField> = [
            (FormField::Name, &self.name),
            (FormField::ContactValue, &self.contact_value),
            (FormField::Project, &self.project),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Build the insert payload. Text fields are trimmed.
    pub fn to_new_lead(&self) -> NewLead {
        NewLead {
            name: self.name.trim().to_string(),
            contact: self.contact_value.trim().to_string(),
            contact_method: self.contact_method,
            budget: Some(budget_label(self.budget_slider.min(SLIDER_MAX))),
            project: self.project.trim().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub request_timeout: Duration,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }
}

/// Clears the busy flag when dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SubmissionFlow<S> {
    store: S,
    form: Mutex<LeadForm>,
    busy: AtomicBool,
    config: SubmissionConfig,
}

impl<S: LeadStore> SubmissionFlow<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, SubmissionConfig::default())
    }

    pub fn with_config(store: S, config: SubmissionConfig) -> Self {
        Self {
            store,
            form: Mutex::new(LeadForm::default()),
            busy: AtomicBool::new(false),
            config,
        }
    }

    /// Snapshot of the current form contents.
    pub fn form(&self) -> LeadForm {
        self.form
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Apply an edit to the form.
    pub fn update_form(&self, edit: impl FnOnce(&mut LeadForm)) {
        let mut form = self.form.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        edit(&mut form);
    }

    pub fn is_submitting(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Budget label for the current slider position.
    pub fn budget_label(&self) -> String {
        budget_label(self.form().budget_slider)
    }

    /// Validate and send the form.
    ///
    /// On success the form is reset to its defaults. On failure the form is
    /// left untouched so the user can correct it or resubmit.
    pub async fn submit(&self, ctx: &FlowContext<'_>) -> Result<(), SubmissionError> {
        let form = self.form();
        if let Err(err) = form.validate() {
            tracing::debug!(error = %err, "Lead form rejected locally");
            ctx.error(TITLE_INVALID, MESSAGE_INVALID);
            return Err(err.into());
        }

        let _guard = BusyGuard::acquire(&self.busy).ok_or(SubmissionError::InFlight)?;

        let payload = form.to_new_lead();
        let timeout = self.config.request_timeout;
        let result = match tokio::time::timeout(timeout, self.store.insert(&payload)).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::new(format!(
                "request timed out after {}s",
                timeout.as_secs()
            ))),
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    contact_method = %payload.contact_method,
                    budget = payload.budget.as_deref().unwrap_or_default(),
                    "Lead submitted",
                );
                self.update_form(|f| *f = LeadForm::default());
                ctx.success(TITLE_SENT, MESSAGE_SENT);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Error submitting lead");
                ctx.error(TITLE_FAILED, MESSAGE_FAILED);
                Err(err.into())
            }
        }
    }
}
