//! Domain types for credit cards.

use serde::{Deserialize, Serialize};

use crate::{Error, FieldError, user::UserID};

/// Alias for ids for the credit card table.
pub type CardId = i64;

/// A credit card whose purchases are grouped into monthly invoices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditCard {
    pub id: CardId,
    pub user_id: UserID,
    pub name: String,
    /// The last digits printed on the card, for display only.
    pub last_digits: String,
    pub credit_limit: f64,
    /// Day of the month the invoice closes.
    pub closing_day: u8,
    /// Day of the month the invoice is due.
    pub due_day: u8,
    pub color: String,
    pub active: bool,
}

/// The client-supplied fields for creating or updating a credit card.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreditCardData {
    pub name: String,
    #[serde(default)]
    pub last_digits: String,
    pub credit_limit: f64,
    pub closing_day: u8,
    pub due_day: u8,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CreditCardData {
    /// Validate the client-supplied fields.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "required", "a name is required"));
        }

        if self.credit_limit < 0.0 || !self.credit_limit.is_finite() {
            errors.push(FieldError::new(
                "credit_limit",
                "non_negative",
                "the credit limit must be zero or greater",
            ));
        }

        if !(1..=31).contains(&self.closing_day) {
            errors.push(FieldError::new(
                "closing_day",
                "range",
                "the closing day must be between 1 and 31",
            ));
        }

        if !(1..=31).contains(&self.due_day) {
            errors.push(FieldError::new(
                "due_day",
                "range",
                "the due day must be between 1 and 31",
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
mod credit_card_data_tests {
    use crate::Error;

    use super::CreditCardData;

    fn valid() -> CreditCardData {
        CreditCardData {
            name: "Platinum".to_owned(),
            last_digits: "4242".to_owned(),
            credit_limit: 5000.0,
            closing_day: 25,
            due_day: 5,
            color: "#3366ff".to_owned(),
            active: true,
        }
    }

    #[test]
    fn valid_card_passes() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_days_fail() {
        let data = CreditCardData {
            closing_day: 0,
            due_day: 32,
            ..valid()
        };

        let Err(Error::Validation(errors)) = data.validate() else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn negative_limit_fails() {
        let data = CreditCardData {
            credit_limit: -1.0,
            ..valid()
        };

        assert!(matches!(data.validate(), Err(Error::Validation(_))));
    }
}
