//! Credential lifecycle API handlers.
//!
//! These endpoints proxy the identity provider: the server adds its API
//! key, forwards the call, and relays the provider's status and body so
//! clients see the provider's own error messages (wrong password, already
//! registered, and so on).

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::services::IdentityClient;

/// Email and password credentials.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Password recovery request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// Register a new account with the identity provider.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Provider response, relayed"),
        (status = 502, description = "Identity provider unreachable", body = crate::error::ErrorResponse),
    )
)]
pub async fn sign_up(
    identity: web::Data<IdentityClient>,
    body: web::Json<CredentialsRequest>,
) -> AppResult<HttpResponse> {
    let (status, payload) = identity.sign_up(&body.email, &body.password).await?;

    Ok(HttpResponse::build(status).json(payload))
}

/// Exchange email and password for a session token.
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Provider response, relayed"),
        (status = 502, description = "Identity provider unreachable", body = crate::error::ErrorResponse),
    )
)]
pub async fn sign_in(
    identity: web::Data<IdentityClient>,
    body: web::Json<CredentialsRequest>,
) -> AppResult<HttpResponse> {
    let (status, payload) = identity
        .sign_in_with_password(&body.email, &body.password)
        .await?;

    Ok(HttpResponse::build(status).json(payload))
}

/// Invalidate the caller's session with the identity provider.
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    tag = "Auth",
    responses(
        (status = 200, description = "Provider response, relayed"),
        (status = 401, description = "No token to sign out", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn sign_out(
    req: HttpRequest,
    identity: web::Data<IdentityClient>,
) -> AppResult<HttpResponse> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

    let (status, payload) = identity.sign_out(token).await?;

    Ok(HttpResponse::build(status).json(payload))
}

/// Send a password recovery email.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Provider response, relayed"),
        (status = 502, description = "Identity provider unreachable", body = crate::error::ErrorResponse),
    )
)]
pub async fn reset_password(
    identity: web::Data<IdentityClient>,
    body: web::Json<ResetPasswordRequest>,
) -> AppResult<HttpResponse> {
    let (status, payload) = identity.reset_password_for_email(&body.email).await?;

    Ok(HttpResponse::build(status).json(payload))
}

/// Configure credential routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/auth/signup")
            .route(web::post().to(sign_up))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/auth/signin")
            .route(web::post().to(sign_in))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/auth/signout")
            .route(web::post().to(sign_out))
            .default_service(super::method_guard()),
    )
    .service(
        web::resource("/auth/reset-password")
            .route(web::post().to(reset_password))
            .default_service(super::method_guard()),
    );
}
