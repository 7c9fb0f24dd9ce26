//! Aggregation over incident lists for the dashboard, analytics, and
//! calendar views.
//!
//! Every function here is a pure re-scan of the list it is handed and takes
//! the reference instant as a parameter, so results are deterministic and
//! repeat invocations have no side effects. All date arithmetic is UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc};
use std::collections::HashMap;

use crate::entity::incident;
use crate::models::{
    AnalyticsStats, CalendarDay, CategoryCounts, DashboardStats, DayStatus, IncidentStatus,
    LocationCount, MonthBucket, Severity, SeverityCounts, StatusCounts,
};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A corrective action is overdue when its due date is strictly before
/// today. Both sides are plain dates, so time-of-day never factors in.
pub fn is_overdue(due: NaiveDate, today: NaiveDate) -> bool {
    due < today
}

/// UTC instant range covering one calendar day: midnight inclusive to the
/// next midnight exclusive.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = start + TimeDelta::days(1);
    (start, end)
}

/// Incident counts per severity.
pub fn severity_counts(incidents: &[incident::Model]) -> SeverityCounts {
    let count = |severity: Severity| {
        incidents
            .iter()
            .filter(|i| i.severity == severity.as_str())
            .count() as u64
    };

    SeverityCounts {
        critical: count(Severity::Critical),
        high: count(Severity::High),
        medium: count(Severity::Medium),
        low: count(Severity::Low),
    }
}

/// Incident counts per status.
pub fn status_counts(incidents: &[incident::Model]) -> StatusCounts {
    let count = |status: IncidentStatus| {
        incidents
            .iter()
            .filter(|i| i.status == status.as_str())
            .count() as u64
    };

    StatusCounts {
        open: count(IncidentStatus::Open),
        in_progress: count(IncidentStatus::InProgress),
        resolved: count(IncidentStatus::Resolved),
        closed: count(IncidentStatus::Closed),
    }
}

/// Incident counts per category.
pub fn category_counts(incidents: &[incident::Model]) -> CategoryCounts {
    let count = |category: &str| {
        incidents
            .iter()
            .filter(|i| i.category == category)
            .count() as u64
    };

    CategoryCounts {
        safety: count("safety"),
        quality: count("quality"),
        environmental: count("environmental"),
        equipment: count("equipment"),
    }
}

/// Trailing 6-month histogram relative to `now`.
///
/// An incident lands in the bucket indexed `5 - monthsDiff`, where
/// `monthsDiff` is the calendar-month difference to `now`; anything outside
/// the window is dropped. The current month is always the last bucket.
pub fn monthly_trend(incidents: &[incident::Model], now: DateTime<Utc>) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = (0..6)
        .map(|i| {
            let (year, month) = month_back(now.year(), now.month(), 5 - i);
            MonthBucket {
                year,
                month,
                label: MONTH_LABELS[(month - 1) as usize].to_string(),
                count: 0,
            }
        })
        .collect();

    for incident in incidents {
        let created = incident.created_at;
        let months_diff = (now.year() - created.year()) * 12
            + (now.month() as i32 - created.month() as i32);

        if (0..6).contains(&months_diff) {
            buckets[(5 - months_diff) as usize].count += 1;
        }
    }

    buckets
}

/// Top `limit` locations by incident count, descending. The sort is stable
/// over first-encounter order, so ties keep the order locations were first
/// seen in the list.
pub fn top_locations(incidents: &[incident::Model], limit: usize) -> Vec<LocationCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();

    for incident in incidents {
        if !counts.contains_key(&incident.location) {
            order.push(incident.location.clone());
        }
        *counts.entry(incident.location.clone()).or_insert(0) += 1;
    }

    let mut ranked: Vec<LocationCount> = order
        .into_iter()
        .map(|location| {
            let count = counts.get(&location).copied().unwrap_or(0);
            LocationCount { location, count }
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Dashboard KPIs and trend over the caller-visible incident list.
///
/// "open" counts the "open" status alone; in-progress incidents are not
/// open for KPI purposes.
pub fn dashboard_stats(incidents: &[incident::Model], now: DateTime<Utc>) -> DashboardStats {
    let total = incidents.len() as u64;
    let open = incidents
        .iter()
        .filter(|i| i.status == IncidentStatus::Open.as_str())
        .count() as u64;
    let critical = incidents
        .iter()
        .filter(|i| i.severity == Severity::Critical.as_str())
        .count() as u64;

    DashboardStats {
        total,
        open,
        critical,
        severity_counts: severity_counts(incidents),
        status_counts: status_counts(incidents),
        monthly_trend: monthly_trend(incidents, now),
    }
}

/// Analytics breakdowns over the caller-visible incident list.
pub fn analytics_stats(incidents: &[incident::Model], now: DateTime<Utc>) -> AnalyticsStats {
    AnalyticsStats {
        category_counts: category_counts(incidents),
        top_locations: top_locations(incidents, 5),
        monthly_trend: monthly_trend(incidents, now),
    }
}

/// Day markers for one calendar month: "critical" when any incident that
/// day is critical, "incident" when any incident exists, "none" otherwise.
///
/// Returns None for an invalid year/month combination.
pub fn calendar_days(
    incidents: &[incident::Model],
    year: i32,
    month: u32,
) -> Option<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    let mut days = Vec::new();
    let mut date = first;

    while date < first_of_next {
        let mut status = DayStatus::None;

        for incident in incidents {
            if incident.created_at.date_naive() == date {
                if incident.severity == Severity::Critical.as_str() {
                    status = DayStatus::Critical;
                    break;
                }
                status = DayStatus::Incident;
            }
        }

        days.push(CalendarDay { date, status });
        date = date.succ_opt()?;
    }

    Some(days)
}

/// Calendar month `back` months before the given one.
fn month_back(year: i32, month: u32, back: i32) -> (i32, u32) {
    let zero_based = month as i32 - 1 - back;
    (year + zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}
