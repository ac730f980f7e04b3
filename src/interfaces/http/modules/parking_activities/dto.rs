//! Parking activity DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::parking_activity::{
    ActivityStats, NewParkingActivity, ParkingActivity, ParkingActivityFilter,
    ParkingActivityPatch,
};
use crate::interfaces::http::common::serde_helpers::double_option;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParkingActivityDto {
    pub id: i32,
    pub user_id: i32,
    pub slot_id: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub active: bool,
    /// Whole minutes between start and end, once ended
    pub duration_minutes: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParkingActivity> for ParkingActivityDto {
    fn from(a: ParkingActivity) -> Self {
        Self {
            active: a.is_active(),
            duration_minutes: a.duration_minutes(),
            id: a.id,
            user_id: a.user_id,
            slot_id: a.slot_id,
            start_time: a.start_time,
            end_time: a.end_time,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateParkingActivityRequest {
    #[validate(range(min = 1))]
    pub user_id: i32,
    #[validate(range(min = 1))]
    pub slot_id: Option<i32>,
    /// Defaults to now
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<CreateParkingActivityRequest> for NewParkingActivity {
    fn from(r: CreateParkingActivityRequest) -> Self {
        Self {
            user_id: r.user_id,
            slot_id: r.slot_id,
            start_time: r.start_time.unwrap_or_else(Utc::now),
            end_time: r.end_time,
        }
    }
}

/// Open a session that starts now
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StartParkingActivityRequest {
    #[validate(range(min = 1))]
    pub user_id: i32,
    #[validate(range(min = 1))]
    pub slot_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateParkingActivityRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub slot_id: Option<Option<i32>>,
    pub start_time: Option<DateTime<Utc>>,
    /// `null` reopens the session
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub end_time: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateParkingActivityRequest> for ParkingActivityPatch {
    fn from(r: UpdateParkingActivityRequest) -> Self {
        Self {
            slot_id: r.slot_id,
            start_time: r.start_time,
            end_time: r.end_time,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListParkingActivitiesParams {
    pub user_id: Option<i32>,
    /// `true` for running sessions, `false` for completed ones
    pub active: Option<bool>,
    /// Lower bound on start time (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Upper bound on start time (RFC 3339)
    pub to: Option<DateTime<Utc>>,
}

impl From<ListParkingActivitiesParams> for ParkingActivityFilter {
    fn from(p: ListParkingActivitiesParams) -> Self {
        Self {
            user_id: p.user_id,
            active: p.active,
            from: p.from,
            to: p.to,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityStatsDto {
    pub total: u64,
    pub active: u64,
    pub completed: u64,
}

impl From<ActivityStats> for ActivityStatsDto {
    fn from(s: ActivityStats) -> Self {
        Self {
            total: s.total,
            active: s.active,
            completed: s.completed,
        }
    }
}
