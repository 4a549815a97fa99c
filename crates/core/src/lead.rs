//! Lead record model: statuses, contact methods, the budget slider mapping and
//! the insert payload accepted by the store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{LeadId, Timestamp};

// ---------------------------------------------------------------------------
// Budget slider
// ---------------------------------------------------------------------------

/// Lowest budget the slider can produce, in roubles.
pub const BUDGET_MIN: u32 = 5_000;
/// Highest budget the slider can produce, in roubles.
pub const BUDGET_MAX: u32 = 20_000;
/// Slider range upper bound (the lower bound is 0).
pub const SLIDER_MAX: u8 = 100;
/// Slider step size.
pub const SLIDER_STEP: u8 = 5;
/// Initial slider position of a fresh form.
pub const SLIDER_DEFAULT: u8 = 50;

/// Currency suffix appended to formatted budgets.
pub const CURRENCY_SUFFIX: &str = "₽";

/// Shown in place of a budget that was never recorded.
pub const BUDGET_UNSPECIFIED: &str = "Не указан";

/// Map a slider position to a budget amount: `round(slider/100 * 15000 + 5000)`.
///
/// Positions above [`SLIDER_MAX`] are clamped.
pub fn budget_amount(slider: u8) -> u32 {
    let slider = slider.min(SLIDER_MAX);
    let span = f64::from(BUDGET_MAX - BUDGET_MIN);
    (f64::from(slider) / f64::from(SLIDER_MAX) * span + f64::from(BUDGET_MIN)).round() as u32
}

/// Format an amount with space-grouped thousands and the currency suffix,
/// e.g. `12500` becomes `"12 500 ₽"`.
pub fn format_budget(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    format!("{grouped} {CURRENCY_SUFFIX}")
}

/// Display string stored for a slider position.
pub fn budget_label(slider: u8) -> String {
    format_budget(budget_amount(slider))
}

/// Read back an amount written by [`format_budget`].
///
/// Returns `None` unless `label` is exactly the canonical rendering of an
/// amount in `BUDGET_MIN..=BUDGET_MAX`.
pub fn parse_budget(label: &str) -> Option<u32> {
    let digits: String = label
        .strip_suffix(CURRENCY_SUFFIX)?
        .chars()
        .filter(|c| *c != ' ')
        .collect();
    let amount: u32 = digits.parse().ok()?;
    ((BUDGET_MIN..=BUDGET_MAX).contains(&amount) && format_budget(amount) == label)
        .then_some(amount)
}

// ---------------------------------------------------------------------------
// LeadStatus
// ---------------------------------------------------------------------------

/// Triage state of a lead. Any state may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Rejected,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 4] = [
        LeadStatus::New,
        LeadStatus::InProgress,
        LeadStatus::Completed,
        LeadStatus::Rejected,
    ];

    /// Wire / database value.
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::InProgress => "in-progress",
            LeadStatus::Completed => "completed",
            LeadStatus::Rejected => "rejected",
        }
    }

    /// Operator-facing label.
    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "Новая",
            LeadStatus::InProgress => "В работе",
            LeadStatus::Completed => "Завершена",
            LeadStatus::Rejected => "Отклонена",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid lead status '{value}'. Must be one of: new, in-progress, completed, rejected"
                ))
            })
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for LeadStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// ContactMethod
// ---------------------------------------------------------------------------

/// How the lead wants to be contacted. `contact` is interpreted accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    #[default]
    Whatsapp,
    Telegram,
    Phone,
}

impl ContactMethod {
    pub const ALL: [ContactMethod; 3] = [
        ContactMethod::Whatsapp,
        ContactMethod::Telegram,
        ContactMethod::Phone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactMethod::Whatsapp => "whatsapp",
            ContactMethod::Telegram => "telegram",
            ContactMethod::Phone => "phone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactMethod::Whatsapp => "WhatsApp",
            ContactMethod::Telegram => "Telegram",
            ContactMethod::Phone => "Телефон",
        }
    }

    /// Example value shown in the contact input for this method.
    pub fn placeholder(self) -> &'static str {
        match self {
            ContactMethod::Telegram => "@username",
            ContactMethod::Whatsapp | ContactMethod::Phone => "+7 999 123 45 67",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid contact method '{value}'. Must be one of: whatsapp, telegram, phone"
                ))
            })
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ContactMethod {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

// ---------------------------------------------------------------------------
// Lead
// ---------------------------------------------------------------------------

/// A single inbound inquiry as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub contact: String,
    pub contact_method: ContactMethod,
    pub budget: Option<String>,
    pub project: String,
    pub status: LeadStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    pub fn budget_display(&self) -> &str {
        self.budget.as_deref().unwrap_or(BUDGET_UNSPECIFIED)
    }

    /// Creation date as `dd.mm.yyyy`.
    pub fn created_on(&self) -> String {
        self.created_at.format("%d.%m.%Y").to_string()
    }
}

/// Insert payload. The store assigns `id`, `status` and both timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub contact: String,
    pub contact_method: ContactMethod,
    #[serde(default)]
    pub budget: Option<String>,
    pub project: String,
}

// ---------------------------------------------------------------------------
// Server-side validation
// ---------------------------------------------------------------------------

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_CONTACT_LENGTH: usize = 200;
pub const MAX_PROJECT_LENGTH: usize = 5_000;

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

/// Validate an insert payload received by the store.
pub fn validate_new_lead(input: &NewLead) -> Result<(), CoreError> {
    validate_text("name", &input.name, MAX_NAME_LENGTH)?;
    validate_text("contact", &input.contact, MAX_CONTACT_LENGTH)?;
    validate_text("project", &input.project, MAX_PROJECT_LENGTH)?;
    if let Some(budget) = &input.budget {
        if parse_budget(budget).is_none() {
            return Err(CoreError::Validation(format!(
                "budget '{budget}' is not an amount between {} and {}",
                format_budget(BUDGET_MIN),
                format_budget(BUDGET_MAX)
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
