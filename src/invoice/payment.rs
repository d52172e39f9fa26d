//! The invoice payment allocator.
//!
//! A payment either settles the invoice in full (status "paid") or raises the
//! absolute paid amount. Whatever is newly applied becomes exactly one expense
//! transaction, written in the same SQL transaction as the invoice update.

use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error,
    card::get_credit_card,
    category::CARD_INVOICE_CATEGORY,
    invoice::{Invoice, InvoiceId, InvoiceStatus, PaymentRequest, db::get_invoice},
    transaction::{NewTransaction, Transaction, TransactionKind, insert_transaction},
    user::UserID,
};

/// The result of a payment call: the updated invoice and, when a positive
/// amount was newly applied, the expense transaction recording it.
#[derive(Debug, Serialize)]
pub struct PaymentOutcome {
    pub invoice: Invoice,
    pub transaction: Option<Transaction>,
}

/// Apply a payment to an invoice.
pub fn pay_invoice(
    invoice_id: InvoiceId,
    user_id: UserID,
    request: &PaymentRequest,
    connection: &mut Connection,
) -> Result<PaymentOutcome, Error> {
    if let Some(paid_amount) = request.paid_amount
        && (paid_amount < 0.0 || !paid_amount.is_finite())
    {
        return Err(Error::validation(
            "paid_amount",
            "non_negative",
            "paid amount must be zero or greater",
        ));
    }

    let sql_transaction = connection.transaction()?;

    let invoice = get_invoice(invoice_id, user_id, &sql_transaction)?;
    let card = get_credit_card(invoice.card_id, user_id, &sql_transaction)?;

    let (applied, paid_amount, status) = match (request.status, request.paid_amount) {
        // Settling in full: the outstanding balance is what gets applied, and
        // paid_amount lands exactly on the total.
        (Some(InvoiceStatus::Paid), _) => (
            invoice.total - invoice.paid_amount,
            invoice.total,
            InvoiceStatus::Paid,
        ),
        (status, Some(supplied)) if supplied > invoice.paid_amount => (
            supplied - invoice.paid_amount,
            supplied,
            status.unwrap_or(invoice.status),
        ),
        (status, _) => (
            0.0,
            invoice.paid_amount,
            status.unwrap_or(invoice.status),
        ),
    };
    let applied = (applied * 100.0).round() / 100.0;

    let transaction = if applied > 0.0 {
        let new_transaction = NewTransaction {
            user_id,
            kind: TransactionKind::Expense,
            amount: applied,
            category: CARD_INVOICE_CATEGORY.to_owned(),
            description: format!("{} {:02}/{}", card.name, invoice.month, invoice.year),
            occurred_on: OffsetDateTime::now_utc().date(),
        };

        Some(insert_transaction(&new_transaction, &sql_transaction)?)
    } else {
        None
    };

    sql_transaction.execute(
        "UPDATE invoice SET paid_amount = ?1, status = ?2 WHERE id = ?3",
        (paid_amount, status.as_str(), invoice_id),
    )?;

    sql_transaction.commit()?;

    Ok(PaymentOutcome {
        invoice: Invoice {
            paid_amount,
            status,
            ..invoice
        },
        transaction,
    })
}
