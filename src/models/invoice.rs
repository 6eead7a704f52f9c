//! Invoice model
//!
//! An invoice settles one order. Amounts are integers in currency minor units.
//! When all three amounts are known they must reconcile:
//! `amount_paid + amount_due == total_amount`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::{validation_error, AppResult};

/// Invoice - maps to the invoices table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: i64,
    pub total_amount: Option<i64>,
    pub amount_paid: Option<i64>,
    pub amount_due: Option<i64>,
    pub created_ts: DateTime<Utc>,
    pub updated_ts: DateTime<Utc>,
    pub order_id: i64,
    pub quote_id: i64,
}

impl Invoice {
    pub fn amounts(&self) -> InvoiceAmounts {
        InvoiceAmounts {
            total_amount: self.total_amount,
            amount_paid: self.amount_paid,
            amount_due: self.amount_due,
        }
    }
}

/// The three settlement amounts of an invoice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceAmounts {
    pub total_amount: Option<i64>,
    pub amount_paid: Option<i64>,
    pub amount_due: Option<i64>,
}

impl InvoiceAmounts {
    /// Overlays the provided amounts on top of the current ones
    pub fn merge(self, changes: InvoiceAmounts) -> InvoiceAmounts {
        InvoiceAmounts {
            total_amount: changes.total_amount.or(self.total_amount),
            amount_paid: changes.amount_paid.or(self.amount_paid),
            amount_due: changes.amount_due.or(self.amount_due),
        }
    }

    /// Checks the reconciliation rules
    pub fn check(&self) -> AppResult<()> {
        for amount in [self.total_amount, self.amount_paid, self.amount_due]
            .into_iter()
            .flatten()
        {
            if amount < 0 {
                return Err(validation_error("amount", "Amounts cannot be negative"));
            }
        }

        if let (Some(total), Some(paid)) = (self.total_amount, self.amount_paid) {
            if paid > total {
                return Err(validation_error(
                    "amount_paid",
                    "Amount paid cannot exceed the total amount",
                ));
            }
        }

        if let (Some(total), Some(paid), Some(due)) =
            (self.total_amount, self.amount_paid, self.amount_due)
        {
            if paid.checked_add(due) != Some(total) {
                return Err(validation_error(
                    "amount_due",
                    "Amount paid plus amount due must equal the total amount",
                ));
            }
        }

        Ok(())
    }

    /// Payment-complete flag implied by the amounts, if the amount due is known
    pub fn payment_complete(&self) -> Option<bool> {
        self.amount_due.map(|due| due == 0)
    }
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub order_id: i64,
    pub quote_id: i64,
    pub amounts: InvoiceAmounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    fn amounts(total: Option<i64>, paid: Option<i64>, due: Option<i64>) -> InvoiceAmounts {
        InvoiceAmounts {
            total_amount: total,
            amount_paid: paid,
            amount_due: due,
        }
    }

    #[test]
    fn test_reconciled_amounts_pass() {
        assert!(amounts(Some(1000), Some(400), Some(600)).check().is_ok());
        assert!(amounts(Some(1000), None, None).check().is_ok());
        assert!(amounts(None, None, None).check().is_ok());
    }

    #[test]
    fn test_mismatched_amounts_rejected() {
        assert!(amounts(Some(1000), Some(400), Some(500)).check().is_err());
        assert!(amounts(Some(1000), Some(1200), None).check().is_err());
        assert!(amounts(Some(-1), None, None).check().is_err());
    }

    #[test]
    fn test_overflowing_amounts_rejected() {
        let err = amounts(Some(i64::MAX), Some(i64::MAX), Some(1)).check().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_merge_keeps_existing_values() {
        let current = amounts(Some(1000), Some(400), Some(600));
        let merged = current.merge(amounts(None, Some(1000), Some(0)));
        assert_eq!(merged, amounts(Some(1000), Some(1000), Some(0)));
        assert!(merged.check().is_ok());
        assert_eq!(merged.payment_complete(), Some(true));
    }

    #[test]
    fn test_payment_complete_unknown_without_due() {
        assert_eq!(amounts(Some(10), Some(5), None).payment_complete(), None);
        assert_eq!(amounts(Some(10), Some(5), Some(5)).payment_complete(), Some(false));
    }
}
