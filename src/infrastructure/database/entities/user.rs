//! User (vehicle owner) entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub first_name: String,
    pub last_name: String,

    #[sea_orm(unique)]
    pub plate_number: String,

    #[sea_orm(nullable)]
    pub contact_number: Option<String>,

    #[sea_orm(nullable)]
    pub service_id: Option<i32>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle_service::Entity",
        from = "Column::ServiceId",
        to = "super::vehicle_service::Column::Id",
        on_delete = "Restrict"
    )]
    Service,
}

impl Related<super::vehicle_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
