//! Distance sensor entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub sensor_type: String,

    /// Sensor health: working, maintenance
    pub status: String,

    /// Last distance reading in centimeters (0–1000)
    pub sensor_range: i32,

    #[sea_orm(nullable)]
    pub arduino_id: Option<i32>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::arduino::Entity",
        from = "Column::ArduinoId",
        to = "super::arduino::Column::Id",
        on_delete = "SetNull"
    )]
    Arduino,
    #[sea_orm(has_many = "super::parking_slot::Entity")]
    ParkingSlots,
}

impl Related<super::arduino::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Arduino.def()
    }
}

impl Related<super::parking_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingSlots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
