//! Corrective action API handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{self, AuthUser};
use crate::db::{DbPool, IncidentScope};
use crate::error::AppResult;
use crate::models::CorrectiveActionResponse;

/// List corrective actions on incidents visible to the caller.
#[utoipa::path(
    get,
    path = "/api/corrective-actions",
    tag = "Corrective Actions",
    responses(
        (status = 200, description = "Corrective actions with overdue flags", body = Vec<CorrectiveActionResponse>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("bearer_token" = [])
    )
)]
pub async fn list_corrective_actions(
    auth: AuthUser,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let scope = auth::incident_scope(&pool, auth.id).await?;

    let actions = match scope {
        IncidentScope::All => pool.list_all_actions().await?,
        IncidentScope::Owner(user_id) => {
            let incidents = pool
                .incidents_in_scope(IncidentScope::Owner(user_id))
                .await?;
            let ids: Vec<Uuid> = incidents.iter().map(|i| i.id).collect();
            pool.actions_for_incidents(&ids).await?
        }
    };

    let today = Utc::now().date_naive();
    let response: Vec<CorrectiveActionResponse> = actions
        .into_iter()
        .map(|action| CorrectiveActionResponse::from_model(action, today))
        .collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Configure corrective action routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/corrective-actions")
            .route(web::get().to(list_corrective_actions))
            .default_service(super::method_guard()),
    );
}
