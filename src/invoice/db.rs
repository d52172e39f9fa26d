//! Database operations for invoices.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    card::{CardId, get_credit_card},
    invoice::{Invoice, InvoiceId, InvoiceStatus},
    user::UserID,
};

/// Create the invoice table.
pub fn create_invoice_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS invoice (
                id INTEGER PRIMARY KEY,
                card_id INTEGER NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                total REAL NOT NULL DEFAULT 0,
                paid_amount REAL NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'open',
                UNIQUE(card_id, month, year),
                FOREIGN KEY(card_id) REFERENCES credit_card(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Retrieve a single invoice, verifying the card chain belongs to `user_id`.
pub fn get_invoice(
    invoice_id: InvoiceId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Invoice, Error> {
    let invoice = connection
        .prepare(
            "SELECT id, card_id, month, year, total, paid_amount, status
             FROM invoice WHERE id = :id",
        )?
        .query_row(&[(":id", &invoice_id)], map_invoice_row)?;

    // Ownership is carried by the card, not the invoice row itself.
    get_credit_card(invoice.card_id, user_id, connection)?;

    Ok(invoice)
}

/// Retrieve a card's invoices, newest billing period first.
pub fn list_card_invoices(
    card_id: CardId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Invoice>, Error> {
    get_credit_card(card_id, user_id, connection)?;

    connection
        .prepare(
            "SELECT id, card_id, month, year, total, paid_amount, status
             FROM invoice
             WHERE card_id = :card_id
             ORDER BY year DESC, month DESC",
        )?
        .query_map(&[(":card_id", &card_id)], map_invoice_row)?
        .map(|maybe_invoice| maybe_invoice.map_err(|error| error.into()))
        .collect()
}

/// Fetch the invoice for a card's billing period, creating an open one if it
/// does not exist yet.
///
/// Callers are expected to have verified card ownership already and to hold
/// an open SQL transaction when this is part of a larger write.
pub(crate) fn get_or_create_invoice(
    card_id: CardId,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<Invoice, Error> {
    let existing = connection
        .prepare(
            "SELECT id, card_id, month, year, total, paid_amount, status
             FROM invoice
             WHERE card_id = :card_id AND month = :month AND year = :year",
        )?
        .query_row(
            rusqlite::named_params! {":card_id": card_id, ":month": month, ":year": year},
            map_invoice_row,
        );

    match existing {
        Ok(invoice) => Ok(invoice),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            connection.execute(
                "INSERT INTO invoice (card_id, month, year) VALUES (?1, ?2, ?3)",
                (card_id, month, year),
            )?;

            Ok(Invoice {
                id: connection.last_insert_rowid(),
                card_id,
                month,
                year,
                total: 0.0,
                paid_amount: 0.0,
                status: InvoiceStatus::Open,
            })
        }
        Err(error) => Err(error.into()),
    }
}

/// Recompute an invoice's total from its purchase rows and return the stored
/// value.
pub(crate) fn recompute_invoice_total(
    invoice_id: InvoiceId,
    connection: &Connection,
) -> Result<f64, Error> {
    let sum: f64 = connection.query_row(
        "SELECT COALESCE(SUM(value), 0) FROM purchase WHERE invoice_id = :invoice_id",
        &[(":invoice_id", &invoice_id)],
        |row| row.get(0),
    )?;
    let total = (sum * 100.0).round() / 100.0;

    connection.execute(
        "UPDATE invoice SET total = ?1 WHERE id = ?2",
        (total, invoice_id),
    )?;

    Ok(total)
}

fn map_invoice_row(row: &Row) -> Result<Invoice, rusqlite::Error> {
    let status: String = row.get(6)?;

    Ok(Invoice {
        id: row.get(0)?,
        card_id: row.get(1)?,
        month: row.get(2)?,
        year: row.get(3)?,
        total: row.get(4)?,
        paid_amount: row.get(5)?,
        status: InvoiceStatus::from_str(&status),
    })
}
