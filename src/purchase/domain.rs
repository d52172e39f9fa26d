//! Domain types for credit card purchases.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, FieldError, card::CardId, invoice::InvoiceId};

/// Alias for ids for the purchase table.
pub type PurchaseId = i64;

/// A single charge on an invoice. Installment plans produce one purchase per
/// invoice, all sharing a `parent_purchase_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub invoice_id: InvoiceId,
    pub value: f64,
    pub date: Date,
    pub description: String,
    pub parent_purchase_id: Option<PurchaseId>,
}

/// The client-supplied fields for recording a purchase.
#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseData {
    pub card_id: CardId,
    /// The full purchase value, split evenly across installments.
    pub value: f64,
    /// Defaults to today when omitted.
    pub date: Option<Date>,
    #[serde(default)]
    pub description: String,
    /// Number of monthly installments, defaulting to a single charge.
    pub installments: Option<u32>,
}

impl PurchaseData {
    /// Validate the client-supplied fields.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();

        if self.value <= 0.0 || !self.value.is_finite() {
            errors.push(FieldError::new(
                "value",
                "positive",
                "value must be a number greater than zero",
            ));
        }

        if let Some(installments) = self.installments
            && !(1..=72).contains(&installments)
        {
            errors.push(FieldError::new(
                "installments",
                "range",
                "installments must be between 1 and 72",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

#[cfg(test)]
mod purchase_data_tests {
    use crate::Error;

    use super::PurchaseData;

    #[test]
    fn zero_value_fails() {
        let data = PurchaseData {
            card_id: 1,
            value: 0.0,
            date: None,
            description: String::new(),
            installments: None,
        };

        assert!(matches!(data.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn zero_installments_fails() {
        let data = PurchaseData {
            card_id: 1,
            value: 100.0,
            date: None,
            description: String::new(),
            installments: Some(0),
        };

        assert!(matches!(data.validate(), Err(Error::Validation(_))));
    }
}
