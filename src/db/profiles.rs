//! Database queries for profiles.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::profile::{self, ActiveModel, Entity as Profile};
use crate::error::{AppError, AppResult};
use crate::models::Role;

use super::DbPool;

impl DbPool {
    /// Get a profile by user id.
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<profile::Model>> {
        let result = Profile::find_by_id(user_id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get profile: {}", e)))?;

        Ok(result)
    }

    /// Create or update the caller's profile.
    ///
    /// Only the display fields are settable; a new row starts with the
    /// default "user" role and the role is never touched here.
    pub async fn upsert_profile(
        &self,
        user_id: Uuid,
        username: Option<String>,
        full_name: Option<String>,
    ) -> AppResult<profile::Model> {
        let existing = self.get_profile(user_id).await?;

        let result = match existing {
            Some(profile) => {
                let mut active: ActiveModel = profile.into();
                if let Some(username) = username {
                    active.username = Set(Some(username));
                }
                if let Some(full_name) = full_name {
                    active.full_name = Set(Some(full_name));
                }
                active.updated_at = Set(Utc::now());

                active
                    .update(self.connection())
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to update profile: {}", e)))?
            }
            None => {
                let now = Utc::now();
                let model = ActiveModel {
                    id: Set(user_id),
                    username: Set(username),
                    full_name: Set(full_name),
                    role: Set(Role::User.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                model
                    .insert(self.connection())
                    .await
                    .map_err(|e| AppError::Database(format!("Failed to insert profile: {}", e)))?
            }
        };

        Ok(result)
    }

    /// All profiles, most recently updated first, with an optional
    /// case-insensitive substring search on username and full name.
    pub async fn list_profiles(&self, search: Option<&str>) -> AppResult<Vec<profile::Model>> {
        let mut select = Profile::find();

        if let Some(search) = search {
            let pattern = format!("%{}%", search);
            select = select.filter(Expr::cust_with_values(
                "(username ILIKE $1 OR full_name ILIKE $2)",
                [pattern.clone(), pattern],
            ));
        }

        let profiles = select
            .order_by_desc(profile::Column::UpdatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list profiles: {}", e)))?;

        Ok(profiles)
    }

    /// Profiles for a set of user ids.
    pub async fn profiles_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<profile::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = Profile::find()
            .filter(profile::Column::Id.is_in(ids.iter().copied()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get profiles: {}", e)))?;

        Ok(profiles)
    }

    /// Change a user's role.
    pub async fn update_profile_role(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> AppResult<profile::Model> {
        let profile = self
            .get_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;

        let mut active: ActiveModel = profile.into();
        active.role = Set(role.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update role: {}", e)))?;

        Ok(result)
    }
}
