//! Auth gate in front of the triage view.
//!
//! The identity provider is external; this module only consumes its
//! capability ([`AuthSnapshot`]) and turns it into a routing decision.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;

/// Entry point unauthenticated operators are sent to.
pub const LOGIN_PATH: &str = "/login";

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: String,
}

/// Identity capability consumed by the triage flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthSnapshot {
    pub current_user: Option<CurrentUser>,
    pub is_admin: bool,
    pub auth_loading: bool,
}

impl AuthSnapshot {
    /// Session lookup still in progress.
    pub fn loading() -> Self {
        Self {
            current_user: None,
            is_admin: false,
            auth_loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: CurrentUser, is_admin: bool) -> Self {
        Self {
            current_user: Some(user),
            is_admin,
            auth_loading: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Render a neutral waiting state; do not fetch.
    Wait,
    /// Navigate to the given path; do not fetch or render lead data.
    Redirect(&'static str),
    Allow,
}

pub fn evaluate(auth: &AuthSnapshot) -> GateDecision {
    if auth.auth_loading {
        return GateDecision::Wait;
    }
    match &auth.current_user {
        Some(_) if auth.is_admin => GateDecision::Allow,
        _ => GateDecision::Redirect(LOGIN_PATH),
    }
}

/// External identity provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the current session.
    async fn snapshot(&self) -> Result<AuthSnapshot, RemoteError>;

    /// Invalidate the current session.
    async fn sign_out(&self) -> Result<(), RemoteError>;
}
