//! Single-row counter bumped at the start of every hold admission.
//!
//! Writing this row first makes concurrent admissions queue on its lock,
//! so the slot/hold counts read afterwards cannot be stale.

use sea_orm::entity::prelude::*;

/// Primary key of the only row in the table
pub const GUARD_ROW_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admission_guard")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub generation: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
