//! Database queries for corrective actions and assignment changes.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::corrective_action::{self, ActiveModel, Entity as CorrectiveAction};
use crate::entity::incident;
use crate::error::{AppError, AppResult};
use crate::models::{ActionStatus, IncidentStatus};

use super::DbPool;

impl DbPool {
    /// Corrective actions for a set of incidents, oldest first.
    pub async fn actions_for_incidents(
        &self,
        incident_ids: &[Uuid],
    ) -> AppResult<Vec<corrective_action::Model>> {
        if incident_ids.is_empty() {
            return Ok(Vec::new());
        }

        let actions = CorrectiveAction::find()
            .filter(corrective_action::Column::IncidentId.is_in(incident_ids.iter().copied()))
            .order_by_asc(corrective_action::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list corrective actions: {}", e))
            })?;

        Ok(actions)
    }

    /// All corrective actions, oldest first.
    pub async fn list_all_actions(&self) -> AppResult<Vec<corrective_action::Model>> {
        let actions = CorrectiveAction::find()
            .order_by_asc(corrective_action::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list corrective actions: {}", e))
            })?;

        Ok(actions)
    }

    /// Assign an incident in one transaction.
    ///
    /// An "open" incident moves to "in-progress"; any other status is kept.
    /// The incident's existing corrective action is re-pointed at the new
    /// assignee, or a pending one is created when none exists. Description
    /// and due date overwrite only when given.
    pub async fn assign_incident(
        &self,
        incident: incident::Model,
        assignee: Uuid,
        description: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> AppResult<(incident::Model, corrective_action::Model)> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start transaction: {}", e)))?;

        let updated_incident = if incident.status == IncidentStatus::Open.as_str() {
            let mut active: incident::ActiveModel = incident.into();
            active.status = Set(IncidentStatus::InProgress.as_str().to_string());
            active
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to update incident: {}", e)))?
        } else {
            incident
        };

        let existing = CorrectiveAction::find()
            .filter(corrective_action::Column::IncidentId.eq(updated_incident.id))
            .order_by_asc(corrective_action::Column::CreatedAt)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get corrective action: {}", e)))?;

        let action = match existing {
            Some(action) => {
                let mut active: ActiveModel = action.into();
                active.assigned_to = Set(Some(assignee));
                if let Some(ref description) = description {
                    active.action_description = Set(Some(description.clone()));
                }
                if let Some(due) = due_date {
                    active.due_date = Set(Some(due));
                }
                active.updated_at = Set(Utc::now());

                active.update(&txn).await.map_err(|e| {
                    AppError::Database(format!("Failed to update corrective action: {}", e))
                })?
            }
            None => {
                let now = Utc::now();
                let new_action = ActiveModel {
                    id: Set(Uuid::now_v7()),
                    incident_id: Set(updated_incident.id),
                    assigned_to: Set(Some(assignee)),
                    action_description: Set(description),
                    due_date: Set(due_date),
                    status: Set(ActionStatus::Pending.as_str().to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                new_action.insert(&txn).await.map_err(|e| {
                    AppError::Database(format!("Failed to insert corrective action: {}", e))
                })?
            }
        };

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok((updated_incident, action))
    }

    /// Unassign an incident in one transaction.
    ///
    /// Deletes the incident's corrective action if one exists and resets the
    /// status to "open" regardless of its prior value.
    pub async fn unassign_incident(
        &self,
        incident: incident::Model,
    ) -> AppResult<incident::Model> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start transaction: {}", e)))?;

        let existing = CorrectiveAction::find()
            .filter(corrective_action::Column::IncidentId.eq(incident.id))
            .order_by_asc(corrective_action::Column::CreatedAt)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get corrective action: {}", e)))?;

        if let Some(action) = existing {
            CorrectiveAction::delete_by_id(action.id)
                .exec(&txn)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to delete corrective action: {}", e))
                })?;
        }

        let mut active: incident::ActiveModel = incident.into();
        active.status = Set(IncidentStatus::Open.as_str().to_string());

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update incident: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(updated)
    }
}
