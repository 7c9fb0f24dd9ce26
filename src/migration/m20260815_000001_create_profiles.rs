//! Migration: Create profiles table and shared trigger function.
//!
//! Profiles carry the display fields and the role for each identity-provider
//! user. The row id equals the provider's user id.

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
                -- Shared trigger function for updated_at
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                -- Profiles table (id = identity provider user id)
                CREATE TABLE profiles (
                    id UUID PRIMARY KEY,
                    username VARCHAR(100),
                    full_name VARCHAR(255),
                    role VARCHAR(20) NOT NULL DEFAULT 'user'
                        CHECK (role IN ('admin', 'manager', 'user', 'viewer')),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for the admin user list (newest activity first)
                CREATE INDEX idx_profiles_updated_at ON profiles(updated_at DESC);

                -- Trigger to update updated_at
                CREATE TRIGGER update_profiles_updated_at
                    BEFORE UPDATE ON profiles
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
                DROP TRIGGER IF EXISTS update_profiles_updated_at ON profiles;
                DROP TABLE IF EXISTS profiles CASCADE;
                DROP FUNCTION IF EXISTS update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }
}
