//! Hold payment domain entity and the slot-capacity admission rule

use chrono::{DateTime, Utc};

use crate::domain::payment::{validate_amount, PaymentMethod, PaymentRange};
use crate::shared::errors::{DomainError, DomainResult};

/// Pre-paid reservation of slot capacity
#[derive(Debug, Clone)]
pub struct HoldPayment {
    pub id: i32,
    pub user_id: i32,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    /// `None` or `Some(false)` while pending, `Some(true)` once done
    pub is_done: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HoldPayment {
    pub fn is_pending(&self) -> bool {
        !self.is_done.unwrap_or(false)
    }

    /// Apply a partial update. A completed hold cannot be reopened here:
    /// pending holds only come into being through admission.
    pub fn apply(&mut self, patch: HoldPaymentPatch) -> DomainResult<()> {
        if patch.is_done == Some(false) && !self.is_pending() {
            return Err(DomainError::Conflict(format!(
                "Hold payment {} is already done and cannot return to pending",
                self.id
            )));
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            self.amount = amount;
        }
        if let Some(method) = patch.payment_method {
            self.payment_method = method;
        }
        if let Some(done) = patch.is_done {
            self.is_done = Some(done);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Validated request for a new hold payment
#[derive(Debug, Clone)]
pub struct NewHoldPayment {
    pub user_id: i32,
    pub amount: f64,
    pub payment_method: PaymentMethod,
}

impl NewHoldPayment {
    pub fn new(user_id: i32, amount: f64, payment_method: PaymentMethod) -> DomainResult<Self> {
        validate_amount(amount)?;
        Ok(Self {
            user_id,
            amount,
            payment_method,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct HoldPaymentPatch {
    pub amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub is_done: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct HoldPaymentFilter {
    pub user_id: Option<i32>,
    pub payment_method: Option<PaymentMethod>,
    pub range: PaymentRange,
    /// `Some(true)` → only pending, `Some(false)` → only done
    pub pending: Option<bool>,
}

/// Slot budget as seen by one admission decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilitySnapshot {
    pub available_count: u64,
    pub pending_count: u64,
    pub remaining: u64,
}

impl AvailabilitySnapshot {
    /// Read-only view without admitting anything.
    pub fn current(available_count: u64, pending_count: u64) -> Self {
        Self {
            available_count,
            pending_count,
            remaining: available_count.saturating_sub(pending_count),
        }
    }
}

/// Decide whether one more pending hold fits in the available-slot budget.
///
/// Admission is granted only while `pending < available`; the returned
/// snapshot already counts the hold being admitted.
pub fn admit(available_count: u64, pending_count: u64) -> DomainResult<AvailabilitySnapshot> {
    if pending_count >= available_count {
        return Err(DomainError::AdmissionDenied {
            available: available_count,
            pending: pending_count,
        });
    }
    let pending_count = pending_count + 1;
    Ok(AvailabilitySnapshot {
        available_count,
        pending_count,
        remaining: available_count - pending_count,
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldPaymentStats {
    pub total: u64,
    pub pending: u64,
    pub done: u64,
    pub total_amount: f64,
}

impl HoldPaymentStats {
    pub fn from_payments(payments: &[HoldPayment]) -> Self {
        payments.iter().fold(Self::default(), |mut acc, p| {
            acc.total += 1;
            if p.is_pending() {
                acc.pending += 1;
            } else {
                acc.done += 1;
            }
            acc.total_amount += p.amount;
            acc
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────
