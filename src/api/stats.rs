//! Aggregated statistics API handlers.
//!
//! All three views are computed over the caller-visible incident list, so
//! a reporter's dashboard reflects only their own incidents while managers
//! and admins see the whole picture.

use actix_web::{HttpResponse, web};
use chrono::{Datelike, Utc};

use crate::auth::{self, AuthUser};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{AnalyticsStats, CalendarQuery, CalendarResponse, DashboardStats};
use crate::services::stats;

/// Dashboard KPIs, severity/status breakdowns, and the 6-month trend.
#[utoipa::path(
    get,
    path = "/api/stats/dashboard",
    tag = "Stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn dashboard(auth: AuthUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let scope = auth::incident_scope(&pool, auth.id).await?;
    let incidents = pool.incidents_in_scope(scope).await?;

    Ok(HttpResponse::Ok().json(stats::dashboard_stats(&incidents, Utc::now())))
}

/// Category breakdown, top locations, and the 6-month trend.
#[utoipa::path(
    get,
    path = "/api/stats/analytics",
    tag = "Stats",
    responses(
        (status = 200, description = "Analytics statistics", body = AnalyticsStats),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn analytics(auth: AuthUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let scope = auth::incident_scope(&pool, auth.id).await?;
    let incidents = pool.incidents_in_scope(scope).await?;

    Ok(HttpResponse::Ok().json(stats::analytics_stats(&incidents, Utc::now())))
}

/// Per-day incident markers for one calendar month.
#[utoipa::path(
    get,
    path = "/api/stats/calendar",
    tag = "Stats",
    params(
        ("year" = Option<i32>, Query, description = "Calendar year (defaults to the current year)"),
        ("month" = Option<u32>, Query, description = "Calendar month 1-12 (defaults to the current month)")
    ),
    responses(
        (status = 200, description = "Day statuses for the month", body = CalendarResponse),
        (status = 400, description = "Invalid year or month", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn calendar(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    query: web::Query<CalendarQuery>,
) -> AppResult<HttpResponse> {
    let now = Utc::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| now.month());

    let scope = auth::incident_scope(&pool, auth.id).await?;
    let incidents = pool.incidents_in_scope(scope).await?;

    let days = stats::calendar_days(&incidents, year, month)
        .ok_or_else(|| AppError::InvalidInput("Invalid year or month".to_string()))?;

    Ok(HttpResponse::Ok().json(CalendarResponse { year, month, days }))
}

/// Configure statistics routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/stats/dashboard")
            .route(web::get().to(dashboard))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/stats/analytics")
            .route(web::get().to(analytics))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/stats/calendar")
            .route(web::get().to(calendar))
            .default_service(super::method_guard()),
    );
}
