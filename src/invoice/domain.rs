//! Domain types for credit card invoices.

use serde::{Deserialize, Serialize};

use crate::card::CardId;

/// Alias for ids for the invoice table.
pub type InvoiceId = i64;

/// The lifecycle of a monthly invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Open,
    Closed,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Open => "open",
            InvoiceStatus::Closed => "closed",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    pub(crate) fn from_str(value: &str) -> Self {
        match value {
            "closed" => InvoiceStatus::Closed,
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            _ => InvoiceStatus::Open,
        }
    }
}

/// A credit card's invoice for a single (month, year).
///
/// `total` is always the sum of the invoice's purchase rows; it is recomputed
/// inside the same SQL transaction as every purchase write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub card_id: CardId,
    /// Calendar month, 1 through 12.
    pub month: u8,
    pub year: i32,
    pub total: f64,
    pub paid_amount: f64,
    pub status: InvoiceStatus,
}

/// The request body for the invoice payment endpoint.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Marking the invoice "paid" settles the outstanding balance in full.
    pub status: Option<InvoiceStatus>,
    /// An absolute paid amount; only increases over the stored value count
    /// as a new payment.
    pub paid_amount: Option<f64>,
}
