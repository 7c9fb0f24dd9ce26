//! Database queries for incidents.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::corrective_action::{self, ActiveModel as ActionActiveModel};
use crate::entity::incident::{self, ActiveModel, Entity as Incident};
use crate::error::{AppError, AppResult};
use crate::models::incident::NewIncident;
use crate::models::{ActionStatus, IncidentStatus, UpdateIncidentRequest};
use crate::services::stats;

use super::DbPool;

/// Which incidents a caller may see. Callers with role "user" see only
/// their own rows; every other caller sees all rows.
#[derive(Debug, Clone, Copy)]
pub enum IncidentScope {
    Owner(Uuid),
    All,
}

impl DbPool {
    /// Insert a new incident, plus its pending corrective action when an
    /// assignee is given, in one transaction.
    ///
    /// Creation never advances the status: the incident stays "open" until
    /// an assignment change transitions it.
    pub async fn create_incident(
        &self,
        new: NewIncident,
    ) -> AppResult<(incident::Model, Option<corrective_action::Model>)> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start transaction: {}", e)))?;

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            category: Set(new.category.as_str().to_string()),
            severity: Set(new.severity.as_str().to_string()),
            status: Set(IncidentStatus::Open.as_str().to_string()),
            department: Set(new.department),
            location: Set(new.location),
            description: Set(new.description),
            immediate_action: Set(new.immediate_action),
            user_id: Set(new.user_id),
            reported_by: Set(new.reported_by),
            created_at: Set(Utc::now()),
        };

        let incident = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert incident: {}", e)))?;

        let action = match new.assigned_to {
            Some(assignee) => {
                let now = Utc::now();
                let action = ActionActiveModel {
                    id: Set(Uuid::now_v7()),
                    incident_id: Set(incident.id),
                    assigned_to: Set(Some(assignee)),
                    action_description: Set(None),
                    due_date: Set(None),
                    status: Set(ActionStatus::Pending.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                let inserted = action.insert(&txn).await.map_err(|e| {
                    AppError::Database(format!("Failed to insert corrective action: {}", e))
                })?;

                Some(inserted)
            }
            None => None,
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok((incident, action))
    }

    /// Get an incident by ID.
    pub async fn get_incident(&self, id: Uuid) -> AppResult<Option<incident::Model>> {
        let result = Incident::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get incident: {}", e)))?;

        Ok(result)
    }

    /// Get an incident by ID, restricted to its owner.
    pub async fn get_incident_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<incident::Model>> {
        let result = Incident::find_by_id(id)
            .filter(incident::Column::UserId.eq(user_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get incident: {}", e)))?;

        Ok(result)
    }

    /// All incidents visible in the given scope, newest first.
    pub async fn incidents_in_scope(
        &self,
        scope: IncidentScope,
    ) -> AppResult<Vec<incident::Model>> {
        let mut select = Incident::find();

        if let IncidentScope::Owner(user_id) = scope {
            select = select.filter(incident::Column::UserId.eq(user_id));
        }

        let incidents = select
            .order_by_desc(incident::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list incidents: {}", e)))?;

        Ok(incidents)
    }

    /// One page of incidents in scope with optional status and day filters,
    /// newest first, plus the total matching count.
    pub async fn list_incidents_page(
        &self,
        scope: IncidentScope,
        status: Option<IncidentStatus>,
        day: Option<NaiveDate>,
        offset: u64,
        limit: u64,
    ) -> AppResult<(Vec<incident::Model>, u64)> {
        let mut select = Incident::find();

        if let IncidentScope::Owner(user_id) = scope {
            select = select.filter(incident::Column::UserId.eq(user_id));
        }

        if let Some(status) = status {
            select = select.filter(incident::Column::Status.eq(status.as_str()));
        }

        if let Some(day) = day {
            let (start, end) = stats::day_bounds(day);
            select = select
                .filter(incident::Column::CreatedAt.gte(start))
                .filter(incident::Column::CreatedAt.lt(end));
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count incidents: {}", e)))?;

        let incidents = select
            .order_by_desc(incident::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list incidents: {}", e)))?;

        Ok((incidents, total))
    }

    /// Apply a partial field update to an incident.
    ///
    /// Enum values must be validated by the caller; this writes whatever it
    /// is handed. Returns the row unchanged when no field is present.
    pub async fn update_incident(
        &self,
        existing: incident::Model,
        changes: &UpdateIncidentRequest,
    ) -> AppResult<incident::Model> {
        let unchanged = existing.clone();
        let mut active: ActiveModel = existing.into();
        let mut dirty = false;

        if let Some(ref category) = changes.category {
            active.category = Set(category.clone());
            dirty = true;
        }
        if let Some(ref severity) = changes.severity {
            active.severity = Set(severity.clone());
            dirty = true;
        }
        if let Some(ref status) = changes.status {
            active.status = Set(status.clone());
            dirty = true;
        }
        if let Some(ref location) = changes.location {
            active.location = Set(location.clone());
            dirty = true;
        }
        if let Some(ref department) = changes.department {
            active.department = Set(department.clone());
            dirty = true;
        }
        if let Some(ref description) = changes.description {
            active.description = Set(description.clone());
            dirty = true;
        }
        if let Some(ref immediate_action) = changes.immediate_action {
            active.immediate_action = Set(immediate_action.clone());
            dirty = true;
        }

        if !dirty {
            return Ok(unchanged);
        }

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update incident: {}", e)))?;

        Ok(result)
    }

    /// Delete an incident and any corrective actions referencing it in one
    /// transaction.
    pub async fn delete_incident(&self, id: Uuid) -> AppResult<()> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start transaction: {}", e)))?;

        corrective_action::Entity::delete_many()
            .filter(corrective_action::Column::IncidentId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to delete corrective actions: {}", e))
            })?;

        Incident::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete incident: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }
}
