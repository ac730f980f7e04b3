//! Parking payment domain entity

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::payment::{validate_amount, PaymentMethod, PaymentRange};
use crate::shared::errors::DomainResult;

/// Payment settling a parking session
#[derive(Debug, Clone)]
pub struct ParkingPayment {
    pub id: i32,
    pub user_id: i32,
    pub activity_id: Option<i32>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParkingPayment {
    pub fn apply(&mut self, patch: ParkingPaymentPatch) -> DomainResult<()> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            self.amount = amount;
        }
        if let Some(method) = patch.payment_method {
            self.payment_method = method;
        }
        if let Some(activity_id) = patch.activity_id {
            self.activity_id = activity_id;
        }
        if let Some(paid_at) = patch.paid_at {
            self.paid_at = paid_at;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewParkingPayment {
    pub user_id: i32,
    pub activity_id: Option<i32>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub paid_at: DateTime<Utc>,
}

impl NewParkingPayment {
    pub fn validate(&self) -> DomainResult<()> {
        validate_amount(self.amount)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParkingPaymentPatch {
    pub amount: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub activity_id: Option<Option<i32>>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ParkingPaymentFilter {
    pub user_id: Option<i32>,
    pub activity_id: Option<i32>,
    pub payment_method: Option<PaymentMethod>,
    /// Date bounds apply to `paid_at`
    pub range: PaymentRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodTotal {
    pub payment_method: PaymentMethod,
    pub count: u64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentStats {
    pub count: u64,
    pub total_amount: f64,
    pub average_amount: f64,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub by_method: Vec<MethodTotal>,
}

impl PaymentStats {
    pub fn from_payments(payments: &[ParkingPayment]) -> Self {
        if payments.is_empty() {
            return Self::default();
        }

        let mut per_method: BTreeMap<&'static str, MethodTotal> = BTreeMap::new();
        let mut total = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for p in payments {
            total += p.amount;
            min = min.min(p.amount);
            max = max.max(p.amount);
            let entry = per_method
                .entry(p.payment_method.as_str())
                .or_insert(MethodTotal {
                    payment_method: p.payment_method,
                    count: 0,
                    total_amount: 0.0,
                });
            entry.count += 1;
            entry.total_amount += p.amount;
        }

        let count = payments.len() as u64;
        Self {
            count,
            total_amount: total,
            average_amount: total / count as f64,
            min_amount: Some(min),
            max_amount: Some(max),
            by_method: per_method.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(amount: f64, method: PaymentMethod) -> ParkingPayment {
        ParkingPayment {
            id: 0,
            user_id: 1,
            activity_id: None,
            amount,
            payment_method: method,
            paid_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_stats() {
        let stats = PaymentStats::from_payments(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.min_amount, None);
        assert!(stats.by_method.is_empty());
    }

    #[test]
    fn stats_group_by_method() {
        let stats = PaymentStats::from_payments(&[
            payment(40.0, PaymentMethod::Gcash),
            payment(60.0, PaymentMethod::Paymaya),
            payment(20.0, PaymentMethod::Gcash),
        ]);
        assert_eq!(stats.count, 3);
        assert!((stats.total_amount - 120.0).abs() < 1e-9);
        assert!((stats.average_amount - 40.0).abs() < 1e-9);
        assert_eq!(stats.min_amount, Some(20.0));
        assert_eq!(stats.max_amount, Some(60.0));

        let gcash = &stats.by_method[0];
        assert_eq!(gcash.payment_method, PaymentMethod::Gcash);
        assert_eq!(gcash.count, 2);
        assert!((gcash.total_amount - 60.0).abs() < 1e-9);
    }
}
