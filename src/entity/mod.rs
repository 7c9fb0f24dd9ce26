//! SeaORM entity definitions for PostgreSQL database.

pub mod corrective_action;
pub mod incident;
pub mod profile;
