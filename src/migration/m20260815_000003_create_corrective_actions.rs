//! Migration: Create corrective_actions table.
//!
//! At most one action per incident by convention; the schema allows more,
//! and readers take the first row per incident. Deletion alongside the
//! owning incident is handled in application transactions, not by cascade.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE corrective_actions (
                    id UUID PRIMARY KEY,
                    incident_id UUID NOT NULL REFERENCES incidents(id),
                    assigned_to UUID,
                    action_description TEXT,
                    due_date DATE,
                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'in-progress', 'completed')),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for the incident join
                CREATE INDEX idx_corrective_actions_incident_id
                    ON corrective_actions(incident_id);

                -- Index for assignee lookups
                CREATE INDEX idx_corrective_actions_assigned_to
                    ON corrective_actions(assigned_to)
                    WHERE assigned_to IS NOT NULL;

                -- Trigger to update updated_at
                CREATE TRIGGER update_corrective_actions_updated_at
                    BEFORE UPDATE ON corrective_actions
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_corrective_actions_updated_at ON corrective_actions;
                DROP TABLE IF EXISTS corrective_actions CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
