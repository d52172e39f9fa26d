//! Domain types for financial goals and contributions.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, FieldError, user::UserID};

/// Alias for ids for the goal table.
pub type GoalId = i64;

/// Alias for ids for the goal contribution table.
pub type ContributionId = i64;

/// A savings goal with a target value.
///
/// `current_value` is always the sum of the goal's contribution rows; it is
/// recomputed inside the same SQL transaction as every contribution write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialGoal {
    pub id: GoalId,
    pub user_id: UserID,
    pub name: String,
    pub category: String,
    pub target_value: f64,
    pub current_value: f64,
    pub target_date: Option<Date>,
    pub completed: bool,
    /// Set once, when the goal first reaches its target. Removing
    /// contributions afterwards does not clear it.
    pub completed_at: Option<OffsetDateTime>,
}

/// The client-supplied fields for creating or updating a goal.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalData {
    pub name: String,
    pub category: String,
    pub target_value: f64,
    pub target_date: Option<Date>,
}

impl GoalData {
    /// Validate the client-supplied fields.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "required", "a name is required"));
        }

        if self.target_value <= 0.0 || !self.target_value.is_finite() {
            errors.push(FieldError::new(
                "target_value",
                "positive",
                "target value must be a number greater than zero",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

/// A single deposit towards a goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalContribution {
    pub id: ContributionId,
    pub goal_id: GoalId,
    pub amount: f64,
    pub date: Date,
    pub notes: String,
}

/// The client-supplied fields for adding a contribution.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContributionData {
    pub amount: f64,
    /// Defaults to today when omitted.
    pub date: Option<Date>,
    #[serde(default)]
    pub notes: String,
}

impl ContributionData {
    /// Validate the client-supplied fields.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount <= 0.0 || !self.amount.is_finite() {
            return Err(Error::validation(
                "amount",
                "positive",
                "amount must be a number greater than zero",
            ));
        }

        Ok(())
    }
}
