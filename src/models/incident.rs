//! Incident domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::incident;

/// Incident category enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Safety,
    Quality,
    Environmental,
    Equipment,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safety => "safety",
            Self::Quality => "quality",
            Self::Environmental => "environmental",
            Self::Equipment => "equipment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "safety" => Some(Self::Safety),
            "quality" => Some(Self::Quality),
            "environmental" => Some(Self::Environmental),
            "equipment" => Some(Self::Equipment),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Incident severity enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Incident status enum.
///
/// Transitions are unconstrained: any value is settable by an authorized
/// editor. The only automatic transitions happen on assignment changes
/// (open to in-progress on first assignment, back to open on unassignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "in-progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request to report a new incident.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    pub category: String,
    pub severity: String,
    pub location: String,
    pub department: String,
    pub description: String,
    /// Immediate action taken at the scene; empty when omitted.
    #[serde(default)]
    pub immediate_action: Option<String>,
    /// Reported on behalf of this user; defaults to the caller.
    #[serde(default)]
    pub reported_by: Option<Uuid>,
    /// Assign on creation: creates a pending corrective action without
    /// advancing the incident status.
    #[serde(default)]
    pub assigned_to: Option<Uuid>,
}

/// Partial update of incident fields. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub immediate_action: Option<String>,
}

/// Assignment change. An empty or absent `assignedTo` unassigns the incident.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub action_description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl AssignmentRequest {
    /// The assignee, if this request assigns rather than unassigns.
    ///
    /// Returns an error for a non-empty value that is not a valid UUID.
    pub fn assignee(&self) -> Result<Option<Uuid>, uuid::Error> {
        match self.assigned_to.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => Uuid::parse_str(s).map(Some),
        }
    }
}

/// Validated input for inserting an incident.
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub category: Category,
    pub severity: Severity,
    pub location: String,
    pub department: String,
    pub description: String,
    pub immediate_action: String,
    pub user_id: Uuid,
    pub reported_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
}

/// Query parameters for the enriched incident list.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IncidentListQuery {
    /// Filter by status.
    #[serde(default)]
    pub status: Option<String>,
    /// Filter to a single day (YYYY-MM-DD, exact match on the creation date).
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Incident row as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IncidentResponse {
    pub id: Uuid,
    pub category: String,
    pub severity: String,
    pub status: String,
    pub department: String,
    pub location: String,
    pub description: String,
    pub immediate_action: String,
    pub user_id: Uuid,
    pub reported_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<incident::Model> for IncidentResponse {
    fn from(model: incident::Model) -> Self {
        IncidentResponse {
            id: model.id,
            category: model.category,
            severity: model.severity,
            status: model.status,
            department: model.department,
            location: model.location,
            description: model.description,
            immediate_action: model.immediate_action,
            user_id: model.user_id,
            reported_by: model.reported_by,
            created_at: model.created_at,
        }
    }
}

/// Incident enriched with reporter/assignee names and the first corrective
/// action's key fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IncidentWithAssignment {
    #[serde(flatten)]
    pub incident: IncidentResponse,
    /// Reporter display name, or "N/A" when the incident has no reporter.
    pub reported_by_name: String,
    pub assigned_to: Option<Uuid>,
    pub assigned_to_name: Option<String>,
    pub action_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    /// True when the corrective action's due date has passed.
    pub overdue: bool,
}

/// Paginated enriched incident list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IncidentListResponse {
    pub incidents: Vec<IncidentWithAssignment>,
    pub pagination: super::Pagination,
}
