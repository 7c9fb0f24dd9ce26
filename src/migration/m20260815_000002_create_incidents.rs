//! Migration: Create incidents table.
//!
//! One row per reported incident. `user_id` is the owning reporter and is
//! not a foreign key: a profile row may not exist yet for a fresh identity.

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
                CREATE TABLE incidents (
                    id UUID PRIMARY KEY,
                    category VARCHAR(20) NOT NULL
                        CHECK (category IN ('safety', 'quality', 'environmental', 'equipment')),
                    severity VARCHAR(20) NOT NULL
                        CHECK (severity IN ('low', 'medium', 'high', 'critical')),
                    status VARCHAR(20) NOT NULL DEFAULT 'open'
                        CHECK (status IN ('open', 'in-progress', 'resolved', 'closed')),
                    department VARCHAR(255) NOT NULL,
                    location VARCHAR(255) NOT NULL,
                    description TEXT NOT NULL,
                    immediate_action TEXT NOT NULL DEFAULT '',
                    user_id UUID NOT NULL,
                    reported_by UUID,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for ownership-scoped listing
                CREATE INDEX idx_incidents_user_id ON incidents(user_id);

                -- Index for recency-ordered listing and day filters
                CREATE INDEX idx_incidents_created_at ON incidents(created_at DESC);

                -- Index for status filters
                CREATE INDEX idx_incidents_status ON incidents(status);
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
                DROP TABLE IF EXISTS incidents CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
