//! API endpoint modules.

pub mod auth;
pub mod corrective_actions;
pub mod health;
pub mod incidents;
pub mod openapi;
pub mod profiles;
pub mod stats;
pub mod users;

pub use auth::configure_routes as configure_auth_routes;
pub use corrective_actions::configure_routes as configure_action_routes;
pub use health::configure_health_routes;
pub use incidents::configure_routes as configure_incident_routes;
pub use openapi::ApiDoc;
pub use profiles::configure_routes as configure_profile_routes;
pub use stats::configure_routes as configure_stats_routes;
pub use users::configure_routes as configure_user_routes;

use actix_web::{HttpResponse, web};

use crate::error::ErrorResponse;

/// Fallback for a known resource hit with an unsupported method.
pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorResponse {
        error: "Method not allowed".to_string(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: "Route not found".to_string(),
    })
}

/// Wrong-method fallback shared by every resource.
pub fn method_guard() -> actix_web::Route {
    web::route().to(method_not_allowed)
}
