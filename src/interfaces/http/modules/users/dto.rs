//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::user::{NewUser, User, UserFilter, UserPatch};
use crate::interfaces::http::common::serde_helpers::double_option;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub plate_number: String,
    pub contact_number: Option<String>,
    pub service_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            plate_number: u.plate_number,
            contact_number: u.contact_number,
            service_id: u.service_id,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 20))]
    #[schema(example = "ABC 1234")]
    pub plate_number: String,
    #[validate(length(min = 7, max = 20))]
    pub contact_number: Option<String>,
    #[validate(range(min = 1))]
    pub service_id: Option<i32>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            plate_number: r.plate_number,
            contact_number: r.contact_number,
            service_id: r.service_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub plate_number: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub contact_number: Option<Option<String>>,
    /// `null` unenrolls the user
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub service_id: Option<Option<i32>>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            plate_number: r.plate_number,
            contact_number: r.contact_number,
            service_id: r.service_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Exact plate number, case-insensitive
    pub plate_number: Option<String>,
    /// Partial plate number
    pub plate_search: Option<String>,
    pub service_id: Option<i32>,
}

impl From<ListUsersParams> for UserFilter {
    fn from(p: ListUsersParams) -> Self {
        Self {
            plate_number: p.plate_number,
            plate_search: p.plate_search,
            service_id: p.service_id,
        }
    }
}
