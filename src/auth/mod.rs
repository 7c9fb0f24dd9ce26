//! Bearer-token authentication and role checks.

mod extractor;
mod verifier;

pub use extractor::AuthError;
pub use verifier::{AuthUser, IdentityClaims, TokenVerifier};

use uuid::Uuid;

use crate::db::{DbPool, IncidentScope};
use crate::entity::profile;
use crate::error::{AppError, AppResult};
use crate::models::Role;

/// Look up the caller's profile and require its role to satisfy the given
/// predicate (one of the [`Role`] allow-list helpers).
///
/// A missing profile and an insufficient role are both forbidden, with
/// distinct messages. Authentication itself happened in the extractor, so
/// only authorization can fail here.
pub async fn require_role(
    pool: &DbPool,
    user_id: Uuid,
    allowed: fn(&Role) -> bool,
) -> AppResult<profile::Model> {
    let profile = pool
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Access denied: Profile not found".to_string()))?;

    let permitted = Role::parse(&profile.role).as_ref().is_some_and(allowed);
    if !permitted {
        return Err(AppError::Forbidden(
            "Access denied: Insufficient permissions".to_string(),
        ));
    }

    Ok(profile)
}

/// Resolve the caller's role, if they have a profile.
pub async fn resolve_role(pool: &DbPool, user_id: Uuid) -> AppResult<Option<Role>> {
    let profile = pool.get_profile(user_id).await?;
    Ok(profile.and_then(|p| Role::parse(&p.role)))
}

/// Incident visibility for a caller: the reporter role only sees its own
/// incidents, every other case (including a missing profile) sees all.
pub async fn incident_scope(pool: &DbPool, user_id: Uuid) -> AppResult<IncidentScope> {
    let role = resolve_role(pool, user_id).await?;
    Ok(match role {
        Some(Role::User) => IncidentScope::Owner(user_id),
        _ => IncidentScope::All,
    })
}
