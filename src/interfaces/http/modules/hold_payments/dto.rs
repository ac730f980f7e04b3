//! Hold payment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::hold_payment::{
    AvailabilitySnapshot, HoldPayment, HoldPaymentFilter, HoldPaymentPatch, HoldPaymentStats,
};
use crate::domain::payment::PaymentRange;
use crate::domain::DomainResult;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HoldPaymentDto {
    pub id: i32,
    pub user_id: i32,
    pub amount: f64,
    /// `gcash` or `paymaya`
    pub payment_method: String,
    pub is_done: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HoldPayment> for HoldPaymentDto {
    fn from(h: HoldPayment) -> Self {
        Self {
            id: h.id,
            user_id: h.user_id,
            amount: h.amount,
            payment_method: h.payment_method.to_string(),
            is_done: h.is_done,
            created_at: h.created_at,
            updated_at: h.updated_at,
        }
    }
}

/// Slot budget: `remaining = available_count - pending_count`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityDto {
    pub available_count: u64,
    pub pending_count: u64,
    pub remaining: u64,
}

impl From<AvailabilitySnapshot> for AvailabilityDto {
    fn from(s: AvailabilitySnapshot) -> Self {
        Self {
            available_count: s.available_count,
            pending_count: s.pending_count,
            remaining: s.remaining,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdmittedHoldDto {
    pub hold_payment: HoldPaymentDto,
    /// Budget after this hold was admitted
    pub availability: AvailabilityDto,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHoldPaymentRequest {
    #[validate(range(min = 1))]
    pub user_id: i32,
    #[schema(example = 50.0)]
    pub amount: f64,
    #[validate(length(min = 1))]
    #[schema(example = "gcash")]
    pub payment_method: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateHoldPaymentRequest {
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    /// `true` marks the hold as used, freeing its place in the slot budget
    pub is_done: Option<bool>,
}

impl UpdateHoldPaymentRequest {
    pub fn into_patch(self) -> DomainResult<HoldPaymentPatch> {
        Ok(HoldPaymentPatch {
            amount: self.amount,
            payment_method: self.payment_method.map(|m| m.parse()).transpose()?,
            is_done: self.is_done,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListHoldPaymentsParams {
    pub user_id: Option<i32>,
    pub payment_method: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// Lower bound on creation time (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Upper bound on creation time (RFC 3339)
    pub to: Option<DateTime<Utc>>,
    /// `true` for pending holds only, `false` for completed ones
    pub pending: Option<bool>,
}

impl ListHoldPaymentsParams {
    pub fn into_filter(self) -> DomainResult<HoldPaymentFilter> {
        Ok(HoldPaymentFilter {
            user_id: self.user_id,
            payment_method: self.payment_method.map(|m| m.parse()).transpose()?,
            range: PaymentRange {
                min_amount: self.min_amount,
                max_amount: self.max_amount,
                from: self.from,
                to: self.to,
            },
            pending: self.pending,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HoldPaymentStatsDto {
    pub total: u64,
    pub pending: u64,
    pub done: u64,
    pub total_amount: f64,
}

impl From<HoldPaymentStats> for HoldPaymentStatsDto {
    fn from(s: HoldPaymentStats) -> Self {
        Self {
            total: s.total,
            pending: s.pending,
            done: s.done,
            total_amount: s.total_amount,
        }
    }
}
