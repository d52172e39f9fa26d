//! Domain types for transactions.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, user::UserID};

/// Alias for ids for the transaction table.
pub type TransactionId = i64;

/// Whether a transaction adds to or subtracts from the user's balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// The kind as it is stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Parse a kind from its stored form, defaulting to expense.
    pub fn from_str(raw: &str) -> Self {
        match raw {
            "income" => TransactionKind::Income,
            _ => TransactionKind::Expense,
        }
    }
}

impl Default for TransactionKind {
    fn default() -> Self {
        TransactionKind::Expense
    }
}

/// A single income or expense record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserID,
    pub kind: TransactionKind,
    pub amount: f64,
    /// The category name at the time the transaction was recorded.
    pub category: String,
    pub description: String,
    pub occurred_on: Date,
    pub created_at: OffsetDateTime,
}

/// The client-supplied fields for creating or updating a transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionData {
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to today when omitted.
    pub occurred_on: Option<Date>,
}

impl TransactionData {
    /// Validate the client-supplied fields.
    ///
    /// # Errors
    /// Returns a validation error naming each offending field.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();

        if self.amount <= 0.0 || !self.amount.is_finite() {
            errors.push(crate::FieldError::new(
                "amount",
                "positive",
                "amount must be a number greater than zero",
            ));
        }

        if self.category.trim().is_empty() {
            errors.push(crate::FieldError::new(
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

/// A fully validated transaction ready to be inserted.
///
/// Built by handlers from [TransactionData], and directly by the
/// recurring-expense launcher and the invoice payment allocator.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: UserID,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub occurred_on: Date,
}

impl NewTransaction {
    /// Build a validated [NewTransaction] from client data.
    pub fn from_data(user_id: UserID, data: &TransactionData) -> Result<Self, Error> {
        data.validate()?;

        Ok(Self {
            user_id,
            kind: data.kind,
            amount: data.amount,
            category: data.category.trim().to_owned(),
            description: data.description.clone(),
            occurred_on: data
                .occurred_on
                .unwrap_or_else(|| OffsetDateTime::now_utc().date()),
        })
    }
}
