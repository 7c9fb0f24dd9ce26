//! Aggregated statistics DTOs for the dashboard, analytics, and calendar views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Incident counts by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeverityCounts {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

/// Incident counts by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub open: u64,
    #[serde(rename = "in-progress")]
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
}

/// Incident counts by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryCounts {
    pub safety: u64,
    pub quality: u64,
    pub environmental: u64,
    pub equipment: u64,
}

/// One calendar month in the trailing 6-month trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    /// Short month name for chart axes (e.g. "Aug").
    pub label: String,
    pub count: u64,
}

/// Dashboard KPIs and trend.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardStats {
    /// All incidents visible to the caller.
    pub total: u64,
    /// Incidents with status "open" (in-progress not included).
    pub open: u64,
    /// Incidents with severity "critical".
    pub critical: u64,
    pub severity_counts: SeverityCounts,
    pub status_counts: StatusCounts,
    pub monthly_trend: Vec<MonthBucket>,
}

/// Incident count for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LocationCount {
    pub location: String,
    pub count: u64,
}

/// Analytics breakdowns.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalyticsStats {
    pub category_counts: CategoryCounts,
    /// Up to five locations, descending by count; ties keep first-seen order.
    pub top_locations: Vec<LocationCount>,
    pub monthly_trend: Vec<MonthBucket>,
}

/// Day marker on the incident calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    None,
    Incident,
    Critical,
}

/// One day of the calendar view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Month selector for the calendar view; defaults to the current month.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CalendarQuery {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

/// Calendar view response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}
