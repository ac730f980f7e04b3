//! Parking payment entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parking_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    #[sea_orm(nullable)]
    pub activity_id: Option<i32>,

    pub amount: f64,

    /// gcash, paymaya
    pub payment_method: String,

    pub paid_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::parking_activity::Entity",
        from = "Column::ActivityId",
        to = "super::parking_activity::Column::Id",
        on_delete = "Restrict"
    )]
    ParkingActivity,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::parking_activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkingActivity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
