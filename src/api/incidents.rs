//! Incident API handlers.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::auth::{self, AuthUser};
use crate::db::{DbPool, IncidentScope};
use crate::entity::{corrective_action, incident, profile};
use crate::error::{AppError, AppResult};
use crate::models::incident::NewIncident;
use crate::models::{
    AssignmentRequest, Category, CorrectiveActionResponse, CreateIncidentRequest,
    IncidentListQuery, IncidentListResponse, IncidentResponse, IncidentStatus,
    IncidentWithAssignment, Pagination, PaginationParams, Role, Severity, UpdateIncidentRequest,
    profile::display_name,
};
use crate::services::stats;

/// List the caller's own incidents, newest first.
#[utoipa::path(
    get,
    path = "/api/incidents",
    tag = "Incidents",
    responses(
        (status = 200, description = "The caller's incidents", body = Vec<IncidentResponse>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn list_my_incidents(
    auth: AuthUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let incidents = pool
        .incidents_in_scope(IncidentScope::Owner(auth.id))
        .await?;

    let response: Vec<IncidentResponse> =
        incidents.into_iter().map(IncidentResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Report a new incident.
///
/// The incident is stamped with the caller as owner and starts out "open".
/// An `assignedTo` value creates a pending corrective action in the same
/// transaction without advancing the incident status.
#[utoipa::path(
    post,
    path = "/api/incidents",
    tag = "Incidents",
    request_body = CreateIncidentRequest,
    responses(
        (status = 200, description = "Incident created"),
        (status = 400, description = "Invalid category or severity", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn create_incident(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateIncidentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let category = Category::parse(&req.category)
        .ok_or_else(|| AppError::InvalidInput("Invalid category".to_string()))?;
    let severity = Severity::parse(&req.severity)
        .ok_or_else(|| AppError::InvalidInput("Invalid severity".to_string()))?;

    let new = NewIncident {
        category,
        severity,
        location: req.location,
        department: req.department,
        description: req.description,
        immediate_action: req.immediate_action.unwrap_or_default(),
        user_id: auth.id,
        reported_by: Some(req.reported_by.unwrap_or(auth.id)),
        assigned_to: req.assigned_to,
    };

    let (incident, action) = pool.create_incident(new).await?;

    info!(
        "Incident created: id={}, category={}, severity={}, assigned={}",
        incident.id,
        incident.category,
        incident.severity,
        action.is_some()
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "incident": IncidentResponse::from(incident),
    })))
}

/// Update fields of an incident owned by the caller.
#[utoipa::path(
    put,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(
        ("id" = Uuid, Path, description = "Incident ID")
    ),
    request_body = UpdateIncidentRequest,
    responses(
        (status = 200, description = "Incident updated"),
        (status = 400, description = "Invalid enum value", body = crate::error::ErrorResponse),
        (status = 404, description = "Incident not found or not owned by the caller", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn update_incident(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateIncidentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let changes = body.into_inner();

    if let Some(ref category) = changes.category {
        Category::parse(category)
            .ok_or_else(|| AppError::InvalidInput("Invalid category".to_string()))?;
    }
    if let Some(ref severity) = changes.severity {
        Severity::parse(severity)
            .ok_or_else(|| AppError::InvalidInput("Invalid severity".to_string()))?;
    }
    if let Some(ref status) = changes.status {
        IncidentStatus::parse(status)
            .ok_or_else(|| AppError::InvalidInput("Invalid status".to_string()))?;
    }

    let existing = pool
        .get_incident_owned(id, auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Incident {}", id)))?;

    let updated = pool.update_incident(existing, &changes).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "incident": IncidentResponse::from(updated),
    })))
}

/// List role-visible incidents with assignment details, paginated.
///
/// Callers with role "user" see only their own incidents; every other
/// caller sees all of them.
#[utoipa::path(
    get,
    path = "/api/incidents/all",
    tag = "Incidents",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("date" = Option<String>, Query, description = "Filter to one day (YYYY-MM-DD)"),
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("limit" = Option<u32>, Query, description = "Results per page (default 100, max 100)")
    ),
    responses(
        (status = 200, description = "Paginated incident list", body = IncidentListResponse),
        (status = 400, description = "Invalid filter value", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn list_all_incidents(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    query: web::Query<IncidentListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let status = match query.status.as_deref() {
        Some(value) => Some(
            IncidentStatus::parse(value)
                .ok_or_else(|| AppError::InvalidInput("Invalid status".to_string()))?,
        ),
        None => None,
    };

    let day = match query.date.as_deref() {
        Some(value) => Some(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            AppError::InvalidInput("Invalid date, expected YYYY-MM-DD".to_string())
        })?),
        None => None,
    };

    let params = PaginationParams {
        page: query.page,
        limit: query.limit,
    };
    let page = params.page.unwrap_or(1);
    let limit = params.clamped_limit();

    let scope = auth::incident_scope(&pool, auth.id).await?;
    let (incidents, total) = pool
        .list_incidents_page(scope, status, day, params.offset() as u64, limit as u64)
        .await?;

    let enriched = enrich_incidents(&pool, incidents).await?;

    let response = IncidentListResponse {
        incidents: enriched,
        pagination: Pagination::new(page, limit, total),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Get one incident with assignment details.
#[utoipa::path(
    get,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(
        ("id" = Uuid, Path, description = "Incident ID")
    ),
    responses(
        (status = 200, description = "The incident", body = IncidentWithAssignment),
        (status = 404, description = "Incident not found or not visible", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn get_incident(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let incident = find_visible_incident(&pool, &auth, id).await?;
    let mut enriched = enrich_incidents(&pool, vec![incident]).await?;

    // enrich_incidents returns exactly one element for a one-element input
    let response = enriched
        .pop()
        .ok_or_else(|| AppError::NotFound(format!("Incident {}", id)))?;

    Ok(HttpResponse::Ok().json(response))
}

/// Delete an incident and its corrective action.
#[utoipa::path(
    delete,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    params(
        ("id" = Uuid, Path, description = "Incident ID")
    ),
    responses(
        (status = 200, description = "Incident deleted"),
        (status = 403, description = "Caller may not delete incidents", body = crate::error::ErrorResponse),
        (status = 404, description = "Incident not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn delete_incident(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    auth::require_role(&pool, auth.id, Role::can_delete_incident).await?;

    let incident = pool
        .get_incident(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Incident {}", id)))?;

    pool.delete_incident(incident.id).await?;

    info!("Incident deleted: id={}, by={}", id, auth.id);

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Assign, reassign, or unassign an incident.
///
/// An empty or absent `assignedTo` unassigns: the corrective action is
/// deleted and the status is reset to "open". A non-empty `assignedTo`
/// assigns: an "open" incident moves to "in-progress" (other statuses are
/// kept) and the corrective action is updated or created as pending.
#[utoipa::path(
    put,
    path = "/api/incidents/{id}/assignment",
    tag = "Incidents",
    params(
        ("id" = Uuid, Path, description = "Incident ID")
    ),
    request_body = AssignmentRequest,
    responses(
        (status = 200, description = "Assignment changed"),
        (status = 400, description = "Malformed assignee id", body = crate::error::ErrorResponse),
        (status = 404, description = "Incident not found or not visible", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn change_assignment(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<AssignmentRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let assignee = req
        .assignee()
        .map_err(|_| AppError::InvalidInput("Invalid assignedTo, expected a user id".to_string()))?;

    let incident = find_visible_incident(&pool, &auth, id).await?;

    let response = match assignee {
        Some(user) => {
            let (incident, action) = pool
                .assign_incident(incident, user, req.action_description, req.due_date)
                .await?;

            info!(
                "Incident assigned: id={}, assignee={}, status={}",
                incident.id, user, incident.status
            );

            json!({
                "success": true,
                "incident": IncidentResponse::from(incident),
                "action": CorrectiveActionResponse::from_model(action, Utc::now().date_naive()),
            })
        }
        None => {
            let incident = pool.unassign_incident(incident).await?;

            info!("Incident unassigned: id={}", incident.id);

            json!({
                "success": true,
                "incident": IncidentResponse::from(incident),
            })
        }
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Fetch an incident the caller is allowed to see, or 404.
async fn find_visible_incident(
    pool: &DbPool,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<incident::Model> {
    let scope = auth::incident_scope(pool, auth.id).await?;

    let incident = match scope {
        IncidentScope::Owner(user_id) => pool.get_incident_owned(id, user_id).await?,
        IncidentScope::All => pool.get_incident(id).await?,
    };

    incident.ok_or_else(|| AppError::NotFound(format!("Incident {}", id)))
}

/// Join incidents with their first corrective action and the reporter and
/// assignee display names.
async fn enrich_incidents(
    pool: &DbPool,
    incidents: Vec<incident::Model>,
) -> AppResult<Vec<IncidentWithAssignment>> {
    let incident_ids: Vec<Uuid> = incidents.iter().map(|i| i.id).collect();
    let actions = pool.actions_for_incidents(&incident_ids).await?;

    // The schema allows several actions per incident; the earliest row wins.
    let mut action_by_incident: HashMap<Uuid, &corrective_action::Model> = HashMap::new();
    for action in &actions {
        action_by_incident.entry(action.incident_id).or_insert(action);
    }

    let mut profile_ids: Vec<Uuid> = incidents
        .iter()
        .filter_map(|i| i.reported_by)
        .chain(actions.iter().filter_map(|a| a.assigned_to))
        .collect();
    profile_ids.sort_unstable();
    profile_ids.dedup();

    let profiles = pool.profiles_by_ids(&profile_ids).await?;
    let name_by_id: HashMap<Uuid, String> = profiles
        .iter()
        .map(|p: &profile::Model| (p.id, display_name(p)))
        .collect();

    let lookup_name = |id: Uuid| {
        name_by_id
            .get(&id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string())
    };

    let today = Utc::now().date_naive();

    let enriched = incidents
        .into_iter()
        .map(|incident| {
            let action = action_by_incident.get(&incident.id).copied();

            let reported_by_name = incident
                .reported_by
                .map(lookup_name)
                .unwrap_or_else(|| "N/A".to_string());

            let assigned_to = action.and_then(|a| a.assigned_to);
            let due_date = action.and_then(|a| a.due_date);
            let overdue = due_date
                .map(|due| stats::is_overdue(due, today))
                .unwrap_or(false);

            IncidentWithAssignment {
                incident: IncidentResponse::from(incident),
                reported_by_name,
                assigned_to,
                assigned_to_name: assigned_to.map(lookup_name),
                action_id: action.map(|a| a.id),
                due_date,
                overdue,
            }
        })
        .collect();

    Ok(enriched)
}

/// Configure incident routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/incidents")
            .route(web::get().to(list_my_incidents))
            .route(web::post().to(create_incident))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/incidents/all")
            .route(web::get().to(list_all_incidents))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/incidents/{id}/assignment")
            .route(web::put().to(change_assignment))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/incidents/{id}")
            .route(web::get().to(get_incident))
            .route(web::put().to(update_incident))
            .route(web::delete().to(delete_incident))
            .default_service(super::method_guard()),
    );
}
