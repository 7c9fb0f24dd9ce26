//! Incident entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "incidents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category: String,
    pub severity: String,
    pub status: String,
    pub department: String,
    pub location: String,
    pub description: String,
    pub immediate_action: String,
    pub user_id: Uuid,
    pub reported_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::corrective_action::Entity")]
    CorrectiveActions,
}

impl Related<super::corrective_action::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CorrectiveActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
