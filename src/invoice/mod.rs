//! Credit card invoices and the payment allocator.

mod db;
mod domain;
mod endpoints;
mod payment;

pub use db::{create_invoice_table, get_invoice, list_card_invoices};
pub(crate) use db::{get_or_create_invoice, recompute_invoice_total};
pub use domain::{Invoice, InvoiceId, InvoiceStatus, PaymentRequest};
pub use endpoints::{
    get_invoice_endpoint, list_card_invoices_endpoint, list_invoice_purchases_endpoint,
    pay_invoice_endpoint,
};
pub use payment::{PaymentOutcome, pay_invoice};
