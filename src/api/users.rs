//! User management API handlers.

use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::auth::{self, AuthUser};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ListUsersQuery, ProfileResponse, Role, UpdateRoleRequest};

/// List all user profiles. Admin only.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(
        ("search" = Option<String>, Query, description = "Substring match on username or full name")
    ),
    responses(
        (status = 200, description = "All profiles", body = Vec<ProfileResponse>),
        (status = 403, description = "Caller is not an admin", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn list_users(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    query: web::Query<ListUsersQuery>,
) -> AppResult<HttpResponse> {
    auth::require_role(&pool, auth.id, Role::can_manage_users).await?;

    let profiles = pool.list_profiles(query.search.as_deref()).await?;
    let response: Vec<ProfileResponse> = profiles.into_iter().map(ProfileResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Change a user's role. Admin only.
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role changed"),
        (status = 400, description = "Invalid role", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn update_user_role(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateRoleRequest>,
) -> AppResult<HttpResponse> {
    auth::require_role(&pool, auth.id, Role::can_manage_users).await?;

    let role = Role::parse(&body.role)
        .ok_or_else(|| AppError::InvalidInput("Invalid role".to_string()))?;

    let profile = pool.update_profile_role(path.into_inner(), role).await?;

    info!(
        "Role changed: user={}, role={}, by={}",
        profile.id, profile.role, auth.id
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "profile": ProfileResponse::from(profile),
    })))
}

/// Get one user's profile. Admins may fetch anyone; everyone else only
/// themselves.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The profile", body = ProfileResponse),
        (status = 403, description = "Caller is neither an admin nor the user", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn get_user(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    if auth.id != id {
        let role = auth::resolve_role(&pool, auth.id).await?;
        if !role.is_some_and(|role| role.is_admin()) {
            return Err(AppError::Forbidden("Access denied".to_string()));
        }
    }

    let profile = pool
        .get_profile(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

/// Configure user management routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::get().to(list_users))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/users/{id}/role")
            .route(web::patch().to(update_user_role))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/users/{id}")
            .route(web::get().to(get_user))
            .default_service(super::method_guard()),
    );
}
