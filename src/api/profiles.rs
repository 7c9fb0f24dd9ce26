//! Profile API handlers for the caller's own profile.

use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{ProfileResponse, UpsertProfileRequest};

/// Get the caller's profile.
///
/// Returns an empty object when no profile row exists yet, matching the
/// behaviour clients rely on to detect a fresh account.
#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "The caller's profile, or {} when none exists", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn get_my_profile(auth: AuthUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let response = match pool.get_profile(auth.id).await? {
        Some(profile) => HttpResponse::Ok().json(ProfileResponse::from(profile)),
        None => HttpResponse::Ok().json(json!({})),
    };

    Ok(response)
}

/// Create or update the caller's profile.
///
/// Only the display fields are settable; the role never changes here.
#[utoipa::path(
    post,
    path = "/api/profile",
    tag = "Profile",
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile saved"),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn upsert_my_profile(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    body: web::Json<UpsertProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let profile = pool
        .upsert_profile(auth.id, req.username, req.full_name)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "profile": ProfileResponse::from(profile),
    })))
}

/// Configure profile routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/profile")
            .route(web::get().to(get_my_profile))
            .route(web::post().to(upsert_my_profile))
            .default_service(super::method_guard()),
    );
}
