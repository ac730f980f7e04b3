//! Payment method and amount rules shared by hold and parking payments

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::errors::{DomainError, DomainResult};

pub const MIN_AMOUNT: f64 = 0.01;
pub const MAX_AMOUNT: f64 = 999.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Gcash,
    Paymaya,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Gcash, PaymentMethod::Paymaya];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gcash => "gcash",
            Self::Paymaya => "paymaya",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gcash" => Ok(Self::Gcash),
            "paymaya" => Ok(Self::Paymaya),
            other => Err(DomainError::Validation(format!(
                "payment_method must be 'gcash' or 'paymaya', got '{}'",
                other
            ))),
        }
    }
}

pub fn validate_amount(amount: f64) -> DomainResult<()> {
    if amount.is_finite() && (MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "amount must be between {:.2} and {:.2}, got {}",
            MIN_AMOUNT, MAX_AMOUNT, amount
        )))
    }
}

/// Optional amount and date bounds shared by payment list filters
#[derive(Debug, Clone, Default)]
pub struct PaymentRange {
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl PaymentRange {
    pub fn validate(&self) -> DomainResult<()> {
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(DomainError::Validation(
                    "min_amount must not exceed max_amount".into(),
                ));
            }
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(DomainError::Validation("from must not be after to".into()));
            }
        }
        Ok(())
    }
}
