//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SafetySync Server",
        version = "0.3.0",
        description = "API server for reporting, assigning, and analyzing workplace HSE incidents"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Incident endpoints
        api::incidents::list_my_incidents,
        api::incidents::create_incident,
        api::incidents::update_incident,
        api::incidents::list_all_incidents,
        api::incidents::get_incident,
        api::incidents::delete_incident,
        api::incidents::change_assignment,
        // Corrective actions
        api::corrective_actions::list_corrective_actions,
        // Profile endpoints
        api::profiles::get_my_profile,
        api::profiles::upsert_my_profile,
        // User management endpoints
        api::users::list_users,
        api::users::update_user_role,
        api::users::get_user,
        // Statistics endpoints
        api::stats::dashboard,
        api::stats::analytics,
        api::stats::calendar,
        // Credential endpoints
        api::auth::sign_up,
        api::auth::sign_in,
        api::auth::sign_out,
        api::auth::reset_password,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::Pagination,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Incidents
            models::Category,
            models::Severity,
            models::IncidentStatus,
            models::CreateIncidentRequest,
            models::UpdateIncidentRequest,
            models::AssignmentRequest,
            models::IncidentResponse,
            models::IncidentWithAssignment,
            models::IncidentListResponse,
            // Corrective actions
            models::ActionStatus,
            models::CorrectiveActionResponse,
            // Profiles
            models::Role,
            models::ProfileResponse,
            models::UpsertProfileRequest,
            models::UpdateRoleRequest,
            // Statistics
            models::SeverityCounts,
            models::StatusCounts,
            models::CategoryCounts,
            models::MonthBucket,
            models::DashboardStats,
            models::LocationCount,
            models::AnalyticsStats,
            models::DayStatus,
            models::CalendarDay,
            models::CalendarResponse,
            // Credentials
            api::auth::CredentialsRequest,
            api::auth::ResetPasswordRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Incidents", description = "Incident reporting, editing, and assignment"),
        (name = "Corrective Actions", description = "Corrective action tracking"),
        (name = "Profile", description = "The caller's own profile"),
        (name = "Users", description = "User and role management"),
        (name = "Stats", description = "Dashboard, analytics, and calendar aggregates"),
        (name = "Auth", description = "Identity provider pass-throughs")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer token security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
