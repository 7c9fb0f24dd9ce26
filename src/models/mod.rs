//! Domain models for SafetySync.

use utoipa::ToSchema;

pub mod corrective_action;
pub mod incident;
pub mod profile;
pub mod role;
pub mod stats;

// Re-export commonly used types
pub use corrective_action::{ActionStatus, CorrectiveActionResponse};
pub use incident::{
    AssignmentRequest, Category, CreateIncidentRequest, IncidentListQuery, IncidentListResponse,
    IncidentResponse, IncidentStatus, IncidentWithAssignment, Severity, UpdateIncidentRequest,
};
pub use profile::{ListUsersQuery, ProfileResponse, UpdateRoleRequest, UpsertProfileRequest};
pub use role::Role;
pub use stats::{
    AnalyticsStats, CalendarDay, CalendarQuery, CalendarResponse, CategoryCounts, DashboardStats,
    DayStatus, LocationCount, MonthBucket, SeverityCounts, StatusCounts,
};

/// Pagination parameters.
#[derive(Debug, Clone, serde::Deserialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    100
}

impl PaginationParams {
    /// Calculate the offset for database queries.
    pub fn offset(&self) -> u32 {
        let page = self.page.unwrap_or(default_page());
        let limit = self.limit.unwrap_or(default_limit());
        (page.saturating_sub(1)) * limit
    }

    /// Clamp limit to maximum allowed value.
    pub fn clamped_limit(&self) -> u32 {
        self.limit.unwrap_or(default_limit()).min(100)
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Clone, serde::Serialize, ToSchema)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Create pagination metadata.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            ((total as f64) / (limit as f64)).ceil() as u32
        };

        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}
