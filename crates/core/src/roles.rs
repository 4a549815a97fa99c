//! Operator roles. Stored as TEXT in `operators.role`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorRole {
    /// May open the triage board and change lead statuses.
    Admin,
    /// Can sign in but is sent back to the login page by the gate.
    #[default]
    Viewer,
}

impl OperatorRole {
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorRole::Admin => "admin",
            OperatorRole::Viewer => "viewer",
        }
    }

    pub fn is_admin(self) -> bool {
        self == OperatorRole::Admin
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "admin" => Ok(OperatorRole::Admin),
            "viewer" => Ok(OperatorRole::Viewer),
            other => Err(CoreError::Validation(format!(
                "Invalid operator role '{other}'. Must be one of: admin, viewer"
            ))),
        }
    }
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for OperatorRole {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_opens_the_board() {
        assert!(OperatorRole::Admin.is_admin());
        assert!(!OperatorRole::Viewer.is_admin());
    }

    #[test]
    fn parse_matches_column_values() {
        assert_eq!(OperatorRole::parse("admin").unwrap(), OperatorRole::Admin);
        assert_eq!(OperatorRole::parse("viewer").unwrap(), OperatorRole::Viewer);
        assert!(OperatorRole::parse("Admin").is_err());
        assert_eq!(
            serde_json::to_string(&OperatorRole::Viewer).unwrap(),
            "\"viewer\""
        );
    }
}
