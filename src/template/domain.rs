//! Domain types for transaction templates.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, FieldError, transaction::TransactionKind, user::UserID};

/// Alias for ids for the transaction template table.
pub type TemplateId = i64;

/// A saved starting point for entering a transaction quickly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionTemplate {
    pub id: TemplateId,
    pub user_id: UserID,
    pub name: String,
    pub category: String,
    pub kind: TransactionKind,
    /// A suggested amount; templates without one prompt for it on use.
    pub amount: Option<f64>,
    pub usage_count: i64,
    pub updated_at: OffsetDateTime,
}

/// The client-supplied fields for creating or updating a template.
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateData {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub kind: TransactionKind,
    pub amount: Option<f64>,
}

impl TemplateData {
    /// Validate the client-supplied fields.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "required", "a name is required"));
        }

        if self.category.trim().is_empty() {
            errors.push(FieldError::new(
                "category",
                "required",
                "a category is required",
            ));
        }

        if let Some(amount) = self.amount
            && (amount <= 0.0 || !amount.is_finite())
        {
            errors.push(FieldError::new(
                "amount",
                "positive",
                "amount must be a number greater than zero",
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
mod template_data_tests {
    use crate::{Error, transaction::TransactionKind};

    use super::TemplateData;

    #[test]
    fn blank_name_and_category_both_reported() {
        let data = TemplateData {
            name: " ".to_owned(),
            category: String::new(),
            kind: TransactionKind::Expense,
            amount: None,
        };

        let Err(Error::Validation(errors)) = data.validate() else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn omitted_amount_is_fine() {
        let data = TemplateData {
            name: "Coffee".to_owned(),
            category: "Alimentação".to_owned(),
            kind: TransactionKind::Expense,
            amount: None,
        };

        assert_eq!(data.validate(), Ok(()));
    }
}
