//! Domain types for investment positions.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, FieldError, user::UserID};

/// Alias for ids for the investment table.
pub type InvestmentId = i64;

/// A position in a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Investment {
    pub id: InvestmentId,
    pub user_id: UserID,
    pub symbol: String,
    pub quantity: f64,
    /// The most recent quote, absent until the first refresh.
    pub last_price: Option<f64>,
    pub updated_at: Option<OffsetDateTime>,
}

/// The client-supplied fields for adding a position.
#[derive(Debug, Serialize, Deserialize)]
pub struct InvestmentData {
    pub symbol: String,
    pub quantity: f64,
}

impl InvestmentData {
    /// Validate the client-supplied fields.
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();

        if self.symbol.trim().is_empty() {
            errors.push(FieldError::new(
                "symbol",
                "required",
                "a ticker symbol is required",
            ));
        }

        if self.quantity <= 0.0 || !self.quantity.is_finite() {
            errors.push(FieldError::new(
                "quantity",
                "positive",
                "quantity must be a number greater than zero",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}
