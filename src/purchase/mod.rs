//! Credit card purchases, including installment plans spanning invoices.

mod db;
mod domain;
mod endpoints;

pub use db::{create_purchase, create_purchase_table, delete_purchase, list_invoice_purchases};
pub use domain::{Purchase, PurchaseData, PurchaseId};
pub use endpoints::{create_purchase_endpoint, delete_purchase_endpoint};
