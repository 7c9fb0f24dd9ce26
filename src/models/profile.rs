//! Profile domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::profile;

/// Profile row as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<profile::Model> for ProfileResponse {
    fn from(model: profile::Model) -> Self {
        ProfileResponse {
            id: model.id,
            username: model.username,
            full_name: model.full_name,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Upsert of the caller's own profile. The role is never settable here.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Admin role change for a user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// Query parameters for the admin user list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListUsersQuery {
    /// Substring match against username and full name, case-insensitive.
    #[serde(default)]
    pub search: Option<String>,
}

/// Display name used when joining profiles into incident views:
/// full name, falling back to username, falling back to "Unknown".
pub fn display_name(profile: &profile::Model) -> String {
    profile
        .full_name
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| profile.username.clone().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "Unknown".to_string())
}
