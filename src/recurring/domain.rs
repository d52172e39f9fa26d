//! Domain types for recurring expenses.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, FieldError, user::UserID};

/// Alias for ids for the recurring expense table.
pub type RecurringExpenseId = i64;

/// A monthly expense that the launcher turns into a transaction once per
/// calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringExpense {
    pub id: RecurringExpenseId,
    pub user_id: UserID,
    pub description: String,
    pub amount: f64,
    pub category: String,
    /// Day of the month the expense is due, 1 to 31. Clamped to the last day
    /// of shorter months at launch time.
    pub due_day: u8,
    pub active: bool,
    /// When the expense was last turned into a transaction. "Launched this
    /// month" is derived by comparing this timestamp's month and year to the
    /// current ones.
    pub last_launched_at: Option<OffsetDateTime>,
    pub notes: String,
}

impl RecurringExpense {
    /// Whether this expense was already launched in the month containing `now`.
    pub fn launched_in_month_of(&self, now: OffsetDateTime) -> bool {
        match self.last_launched_at {
            Some(launched_at) => {
                launched_at.month() == now.month() && launched_at.year() == now.year()
            }
            None => false,
        }
    }
}

/// The client-supplied fields for creating or updating a recurring expense.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecurringExpenseData {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub due_day: u8,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub notes: String,
}

fn default_active() -> bool {
    true
}

impl RecurringExpenseData {
    /// Validate the client-supplied fields.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();

        if self.description.trim().is_empty() {
            errors.push(FieldError::new(
                "description",
                "required",
                "a description is required",
            ));
        }

        if self.amount <= 0.0 || !self.amount.is_finite() {
            errors.push(FieldError::new(
                "amount",
                "positive",
                "amount must be a number greater than zero",
            ));
        }

        if !(1..=31).contains(&self.due_day) {
            errors.push(FieldError::new(
                "due_day",
                "range",
                "due day must be between 1 and 31",
            ));
        }

        if self.category.trim().is_empty() {
            errors.push(FieldError::new(
                "category",
                "required",
                "a category is required",
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
mod recurring_expense_data_tests {
    use crate::Error;

    use super::RecurringExpenseData;

    fn valid_data() -> RecurringExpenseData {
        RecurringExpenseData {
            description: "Rent".to_owned(),
            amount: 1200.0,
            category: "Moradia".to_owned(),
            due_day: 5,
            active: true,
            notes: String::new(),
        }
    }

    #[test]
    fn valid_data_passes() {
        assert!(valid_data().validate().is_ok());
    }

    #[test]
    fn due_day_zero_fails() {
        let data = RecurringExpenseData {
            due_day: 0,
            ..valid_data()
        };

        assert!(matches!(data.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn due_day_32_fails() {
        let data = RecurringExpenseData {
            due_day: 32,
            ..valid_data()
        };

        assert!(matches!(data.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn multiple_offending_fields_are_all_reported() {
        let data = RecurringExpenseData {
            description: String::new(),
            amount: 0.0,
            ..valid_data()
        };

        match data.validate() {
            Err(Error::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
