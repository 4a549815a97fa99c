//! Error types shared across the workspace.
//!
//! [`CoreError`] is the domain error used by the HTTP service. The remaining
//! types form the taxonomy surfaced by the client-side flows: a local
//! [`ValidationError`] that blocks a call entirely, and [`RemoteError`] (plus
//! its fetch/update wrappers) for anything that failed at the store boundary.

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// A required form field, named as it appears in the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    ContactValue,
    Project,
}

impl FormField {
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::ContactValue => "contact_value",
            FormField::Project => "project",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local pre-flight failure: one or more required fields are blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("required fields are empty: {}", join_fields(.missing))]
pub struct ValidationError {
    pub missing: Vec<FormField>,
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Opaque failure reported by the remote store, carrying a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("remote store error: {message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure to load the lead list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to fetch leads: {0}")]
pub struct FetchError(#[from] pub RemoteError);

/// Failure to change a lead's status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to update lead status: {0}")]
pub struct UpdateError(#[from] pub RemoteError);

/// Outcome of a rejected form submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A previous submission from the same form is still outstanding.
    #[error("a submission is already in flight")]
    InFlight,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
