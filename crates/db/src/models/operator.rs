//! Operator account row.

use rocketlab_core::auth_gate::CurrentUser;
use rocketlab_core::roles::OperatorRole;
use rocketlab_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from `operators`. Holds the password hash, so it is never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct Operator {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: OperatorRole,
    pub is_active: bool,
    pub last_sign_in_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Operator {
    /// The public identity reported to the auth gate.
    pub fn current_user(&self) -> CurrentUser {
        CurrentUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role.as_str().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct NewOperator<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: OperatorRole,
}
