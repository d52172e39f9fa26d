//! Database operations for credit cards.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    card::{CardId, CreditCard, CreditCardData},
    user::UserID,
};

/// Create the credit card table.
pub fn create_credit_card_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS credit_card (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                last_digits TEXT NOT NULL DEFAULT '',
                credit_limit REAL NOT NULL DEFAULT 0,
                closing_day INTEGER NOT NULL,
                due_day INTEGER NOT NULL,
                color TEXT NOT NULL DEFAULT '',
                active INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Create a credit card and return it with its generated ID.
pub fn create_credit_card(
    user_id: UserID,
    data: &CreditCardData,
    connection: &Connection,
) -> Result<CreditCard, Error> {
    connection.execute(
        "INSERT INTO credit_card (user_id, name, last_digits, credit_limit, closing_day, due_day, color, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            user_id.as_i64(),
            data.name.trim(),
            &data.last_digits,
            data.credit_limit,
            data.closing_day,
            data.due_day,
            &data.color,
            data.active,
        ),
    )?;

    Ok(CreditCard {
        id: connection.last_insert_rowid(),
        user_id,
        name: data.name.trim().to_owned(),
        last_digits: data.last_digits.clone(),
        credit_limit: data.credit_limit,
        closing_day: data.closing_day,
        due_day: data.due_day,
        color: data.color.clone(),
        active: data.active,
    })
}

/// Retrieve a single credit card owned by `user_id`.
pub fn get_credit_card(
    card_id: CardId,
    user_id: UserID,
    connection: &Connection,
) -> Result<CreditCard, Error> {
    let card = connection
        .prepare(
            "SELECT id, user_id, name, last_digits, credit_limit, closing_day, due_day, color, active
             FROM credit_card WHERE id = :id",
        )?
        .query_row(&[(":id", &card_id)], map_card_row)?;

    if card.user_id != user_id {
        return Err(Error::Forbidden);
    }

    Ok(card)
}

/// Retrieve all of the user's credit cards.
pub fn list_credit_cards(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<CreditCard>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, last_digits, credit_limit, closing_day, due_day, color, active
             FROM credit_card
             WHERE user_id = :user_id
             ORDER BY active DESC, name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_card_row)?
        .map(|maybe_card| maybe_card.map_err(|error| error.into()))
        .collect()
}

/// Update a credit card's fields.
pub fn update_credit_card(
    card_id: CardId,
    user_id: UserID,
    data: &CreditCardData,
    connection: &Connection,
) -> Result<CreditCard, Error> {
    let existing = get_credit_card(card_id, user_id, connection)?;

    connection.execute(
        "UPDATE credit_card
         SET name = ?1, last_digits = ?2, credit_limit = ?3, closing_day = ?4,
             due_day = ?5, color = ?6, active = ?7
         WHERE id = ?8",
        (
            data.name.trim(),
            &data.last_digits,
            data.credit_limit,
            data.closing_day,
            data.due_day,
            &data.color,
            data.active,
            card_id,
        ),
    )?;

    Ok(CreditCard {
        name: data.name.trim().to_owned(),
        last_digits: data.last_digits.clone(),
        credit_limit: data.credit_limit,
        closing_day: data.closing_day,
        due_day: data.due_day,
        color: data.color.clone(),
        active: data.active,
        ..existing
    })
}

/// Delete a credit card.
pub fn delete_credit_card(
    card_id: CardId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    get_credit_card(card_id, user_id, connection)?;

    connection.execute("DELETE FROM credit_card WHERE id = ?1", [card_id])?;

    Ok(())
}

fn map_card_row(row: &Row) -> Result<CreditCard, rusqlite::Error> {
    Ok(CreditCard {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        last_digits: row.get(3)?,
        credit_limit: row.get(4)?,
        closing_day: row.get(5)?,
        due_day: row.get(6)?,
        color: row.get(7)?,
        active: row.get(8)?,
    })
}
