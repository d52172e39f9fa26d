//! Database operations for purchases.
//!
//! Purchase writes always run inside a single SQL transaction that also
//! recomputes the totals of every invoice they touch.

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    card::get_credit_card,
    invoice::{InvoiceId, get_invoice, get_or_create_invoice, recompute_invoice_total},
    purchase::{Purchase, PurchaseData, PurchaseId},
    user::UserID,
};

/// Create the purchase table.
pub fn create_purchase_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS purchase (
                id INTEGER PRIMARY KEY,
                invoice_id INTEGER NOT NULL,
                value REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                parent_purchase_id INTEGER,
                FOREIGN KEY(invoice_id) REFERENCES invoice(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Record a purchase, creating one row per installment.
///
/// A purchase dated after the card's closing day lands on the next month's
/// invoice; each further installment lands one billing period later. The
/// value is split evenly with the last installment absorbing the rounding
/// remainder, so the installments always sum to the original value.
pub fn create_purchase(
    user_id: UserID,
    data: &PurchaseData,
    connection: &mut Connection,
) -> Result<Vec<Purchase>, Error> {
    data.validate()?;

    let sql_transaction = connection.transaction()?;

    let card = get_credit_card(data.card_id, user_id, &sql_transaction)?;
    let date = data.date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let installments = data.installments.unwrap_or(1);

    let (mut month, mut year) = billing_period(date, card.closing_day);
    let per_installment = ((data.value / installments as f64) * 100.0).round() / 100.0;
    let last_installment =
        ((data.value - per_installment * (installments - 1) as f64) * 100.0).round() / 100.0;

    let mut purchases = Vec::with_capacity(installments as usize);
    let mut parent_purchase_id = None;

    for index in 0..installments {
        let invoice = get_or_create_invoice(card.id, month, year, &sql_transaction)?;
        let value = if index == installments - 1 {
            last_installment
        } else {
            per_installment
        };
        let description = if installments > 1 {
            format!("{} ({}/{})", data.description.trim(), index + 1, installments)
        } else {
            data.description.trim().to_owned()
        };

        sql_transaction.execute(
            "INSERT INTO purchase (invoice_id, value, date, description, parent_purchase_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (invoice.id, value, date, &description, parent_purchase_id),
        )?;
        let id = sql_transaction.last_insert_rowid();

        if installments > 1 && parent_purchase_id.is_none() {
            // The first installment anchors the group, itself included.
            parent_purchase_id = Some(id);
            sql_transaction.execute(
                "UPDATE purchase SET parent_purchase_id = ?1 WHERE id = ?1",
                [id],
            )?;
        }

        recompute_invoice_total(invoice.id, &sql_transaction)?;

        purchases.push(Purchase {
            id,
            invoice_id: invoice.id,
            value,
            date,
            description,
            parent_purchase_id,
        });

        (month, year) = next_period(month, year);
    }

    sql_transaction.commit()?;

    Ok(purchases)
}

/// Delete a purchase.
///
/// Deleting any member of an installment group deletes the whole group, and
/// every invoice that lost a row has its total recomputed.
pub fn delete_purchase(
    purchase_id: PurchaseId,
    user_id: UserID,
    connection: &mut Connection,
) -> Result<(), Error> {
    let sql_transaction = connection.transaction()?;

    let purchase = sql_transaction
        .prepare(
            "SELECT id, invoice_id, value, date, description, parent_purchase_id
             FROM purchase WHERE id = :id",
        )?
        .query_row(&[(":id", &purchase_id)], map_purchase_row)?;

    get_invoice(purchase.invoice_id, user_id, &sql_transaction)?;

    let affected_invoices: Vec<InvoiceId> = match purchase.parent_purchase_id {
        Some(parent_id) => {
            let invoice_ids = sql_transaction
                .prepare(
                    "SELECT DISTINCT invoice_id FROM purchase WHERE parent_purchase_id = :parent",
                )?
                .query_map(&[(":parent", &parent_id)], |row| row.get(0))?
                .collect::<Result<Vec<InvoiceId>, _>>()?;

            sql_transaction.execute(
                "DELETE FROM purchase WHERE parent_purchase_id = ?1",
                [parent_id],
            )?;

            invoice_ids
        }
        None => {
            sql_transaction.execute("DELETE FROM purchase WHERE id = ?1", [purchase_id])?;

            vec![purchase.invoice_id]
        }
    };

    for invoice_id in affected_invoices {
        recompute_invoice_total(invoice_id, &sql_transaction)?;
    }

    sql_transaction.commit()?;

    Ok(())
}

/// Retrieve an invoice's purchases, verifying the card chain belongs to
/// `user_id`.
pub fn list_invoice_purchases(
    invoice_id: InvoiceId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Purchase>, Error> {
    get_invoice(invoice_id, user_id, connection)?;

    connection
        .prepare(
            "SELECT id, invoice_id, value, date, description, parent_purchase_id
             FROM purchase
             WHERE invoice_id = :invoice_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":invoice_id", &invoice_id)], map_purchase_row)?
        .map(|maybe_purchase| maybe_purchase.map_err(|error| error.into()))
        .collect()
}

/// The billing period a purchase date falls into: after the closing day the
/// charge rolls over to the next month's invoice.
fn billing_period(date: Date, closing_day: u8) -> (u8, i32) {
    let month = u8::from(date.month());
    let year = date.year();

    if date.day() > closing_day {
        next_period(month, year)
    } else {
        (month, year)
    }
}

fn next_period(month: u8, year: i32) -> (u8, i32) {
    if month == 12 { (1, year + 1) } else { (month + 1, year) }
}

fn map_purchase_row(row: &Row) -> Result<Purchase, rusqlite::Error> {
    Ok(Purchase {
        id: row.get(0)?,
        invoice_id: row.get(1)?,
        value: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        parent_purchase_id: row.get(5)?,
    })
}
