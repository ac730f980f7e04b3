//! Parking payment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::parking_payment::{
    MethodTotal, NewParkingPayment, ParkingPayment, ParkingPaymentFilter, ParkingPaymentPatch,
    PaymentStats,
};
use crate::domain::payment::PaymentRange;
use crate::domain::DomainResult;
use crate::interfaces::http::common::serde_helpers::double_option;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParkingPaymentDto {
    pub id: i32,
    pub user_id: i32,
    pub activity_id: Option<i32>,
    pub amount: f64,
    pub payment_method: String,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParkingPayment> for ParkingPaymentDto {
    fn from(p: ParkingPayment) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            activity_id: p.activity_id,
            amount: p.amount,
            payment_method: p.payment_method.to_string(),
            paid_at: p.paid_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateParkingPaymentRequest {
    #[validate(range(min = 1))]
    pub user_id: i32,
    #[validate(range(min = 1))]
    pub activity_id: Option<i32>,
    #[schema(example = 40.0)]
    pub amount: f64,
    #[schema(example = "paymaya")]
    pub payment_method: String,
    /// Defaults to now
    pub paid_at: Option<DateTime<Utc>>,
}

impl CreateParkingPaymentRequest {
    pub fn into_new(self) -> DomainResult<NewParkingPayment> {
        Ok(NewParkingPayment {
            user_id: self.user_id,
            activity_id: self.activity_id,
            amount: self.amount,
            payment_method: self.payment_method.parse()?,
            paid_at: self.paid_at.unwrap_or_else(Utc::now),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateParkingPaymentRequest {
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub activity_id: Option<Option<i32>>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl UpdateParkingPaymentRequest {
    pub fn into_patch(self) -> DomainResult<ParkingPaymentPatch> {
        Ok(ParkingPaymentPatch {
            amount: self.amount,
            payment_method: self.payment_method.map(|m| m.parse()).transpose()?,
            activity_id: self.activity_id,
            paid_at: self.paid_at,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListParkingPaymentsParams {
    pub user_id: Option<i32>,
    pub activity_id: Option<i32>,
    pub payment_method: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// Lower bound on `paid_at` (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Upper bound on `paid_at` (RFC 3339)
    pub to: Option<DateTime<Utc>>,
}

impl ListParkingPaymentsParams {
    pub fn into_filter(self) -> DomainResult<ParkingPaymentFilter> {
        Ok(ParkingPaymentFilter {
            user_id: self.user_id,
            activity_id: self.activity_id,
            payment_method: self.payment_method.map(|m| m.parse()).transpose()?,
            range: PaymentRange {
                min_amount: self.min_amount,
                max_amount: self.max_amount,
                from: self.from,
                to: self.to,
            },
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MethodTotalDto {
    pub payment_method: String,
    pub count: u64,
    pub total_amount: f64,
}

impl From<MethodTotal> for MethodTotalDto {
    fn from(m: MethodTotal) -> Self {
        Self {
            payment_method: m.payment_method.to_string(),
            count: m.count,
            total_amount: m.total_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatsDto {
    pub count: u64,
    pub total_amount: f64,
    pub average_amount: f64,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub by_method: Vec<MethodTotalDto>,
}

impl From<PaymentStats> for PaymentStatsDto {
    fn from(s: PaymentStats) -> Self {
        Self {
            count: s.count,
            total_amount: s.total_amount,
            average_amount: s.average_amount,
            min_amount: s.min_amount,
            max_amount: s.max_amount,
            by_method: s.by_method.into_iter().map(MethodTotalDto::from).collect(),
        }
    }
}
