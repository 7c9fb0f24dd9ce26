//! User roles and the permission predicates derived from them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authorization role stored on a profile.
///
/// The role is the sole authorization axis: every permission check is a
/// membership test against a fixed allow-list of roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
            Self::Viewer => "viewer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "manager" => Some(Self::Manager),
            "user" => Some(Self::User),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    pub fn can_create_incident(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::User)
    }

    pub fn can_delete_incident(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    pub fn can_manage_users(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
