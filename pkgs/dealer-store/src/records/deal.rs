//! Sale agreements with an embedded payment schedule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealStatus {
    Active,
    Completed,
    Cancelled,
}

/// One entry of a deal's payment schedule. Owned by the deal, not a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstallment {
    pub id: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub property_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub agreed_price: f64,
    #[serde(default)]
    pub payment_schedule: Vec<PaymentInstallment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<f64>,
    #[serde(default)]
    pub agreement_files: Vec<String>,
    pub status: DealStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    pub fn paid_installments(&self) -> usize {
        self.payment_schedule.iter().filter(|p| p.paid).count()
    }

    pub fn commission_or_zero(&self) -> f64 {
        self.commission.unwrap_or(0.0)
    }

    /// Flip one installment between paid and unpaid. Paying stamps `paid_date`
    /// with `now`, unpaying clears it. Returns the new paid flag.
    pub fn toggle_payment(&mut self, installment_id: &str, now: DateTime<Utc>) -> Result<bool> {
        let installment = self
            .payment_schedule
            .iter_mut()
            .find(|p| p.id == installment_id)
            .ok_or_else(|| {
                StoreError::Validation(format!(
                    "deal '{}' has no installment '{}'",
                    self.id, installment_id
                ))
            })?;

        installment.paid = !installment.paid;
        installment.paid_date = installment.paid.then_some(now);
        self.updated_at = now;
        Ok(installment.paid)
    }
}
