//! Corrective action domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::corrective_action;

/// Corrective action status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    Pending,
    InProgress,
    Completed,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Corrective action row as returned by the API, with the derived
/// `overdue` flag.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CorrectiveActionResponse {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub assigned_to: Option<Uuid>,
    pub action_description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CorrectiveActionResponse {
    /// Build the response, computing `overdue` against the given day.
    pub fn from_model(model: corrective_action::Model, today: NaiveDate) -> Self {
        let overdue = model
            .due_date
            .map(|due| crate::services::stats::is_overdue(due, today))
            .unwrap_or(false);

        CorrectiveActionResponse {
            id: model.id,
            incident_id: model.incident_id,
            assigned_to: model.assigned_to,
            action_description: model.action_description,
            due_date: model.due_date,
            status: model.status,
            overdue,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
