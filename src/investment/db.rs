//! Database operations for investment positions.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    investment::{Investment, InvestmentData, InvestmentId},
    user::UserID,
};

/// Create the investment table.
pub fn create_investment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS investment (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                symbol TEXT NOT NULL,
                quantity REAL NOT NULL,
                last_price REAL,
                updated_at TEXT,
                UNIQUE(user_id, symbol),
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Add a position and return it with its generated ID.
pub fn create_investment(
    user_id: UserID,
    data: &InvestmentData,
    connection: &Connection,
) -> Result<Investment, Error> {
    let symbol = data.symbol.trim().to_uppercase();

    let result = connection.execute(
        "INSERT INTO investment (user_id, symbol, quantity) VALUES (?1, ?2, ?3)",
        (user_id.as_i64(), &symbol, data.quantity),
    );

    if let Err(rusqlite::Error::SqliteFailure(sql_error, Some(desc))) = &result
        && sql_error.extended_code == 2067
        && desc.contains("investment.symbol")
    {
        return Err(Error::validation(
            "symbol",
            "duplicate",
            "this symbol is already in your portfolio",
        ));
    }
    result?;

    Ok(Investment {
        id: connection.last_insert_rowid(),
        user_id,
        symbol,
        quantity: data.quantity,
        last_price: None,
        updated_at: None,
    })
}

/// Retrieve a single position owned by `user_id`.
pub fn get_investment(
    investment_id: InvestmentId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Investment, Error> {
    let investment = connection
        .prepare(
            "SELECT id, user_id, symbol, quantity, last_price, updated_at
             FROM investment WHERE id = :id",
        )?
        .query_row(&[(":id", &investment_id)], map_investment_row)?;

    if investment.user_id != user_id {
        return Err(Error::Forbidden);
    }

    Ok(investment)
}

/// Retrieve all of the user's positions.
pub fn list_investments(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Investment>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, symbol, quantity, last_price, updated_at
             FROM investment
             WHERE user_id = :user_id
             ORDER BY symbol ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_investment_row)?
        .map(|maybe_investment| maybe_investment.map_err(|error| error.into()))
        .collect()
}

/// Store a fresh quote for a position.
pub fn update_investment_price(
    investment_id: InvestmentId,
    price: f64,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "UPDATE investment SET last_price = ?1, updated_at = ?2 WHERE id = ?3",
        (price, OffsetDateTime::now_utc(), investment_id),
    )?;

    Ok(())
}

/// Delete a position.
pub fn delete_investment(
    investment_id: InvestmentId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    get_investment(investment_id, user_id, connection)?;

    connection.execute("DELETE FROM investment WHERE id = ?1", [investment_id])?;

    Ok(())
}

fn map_investment_row(row: &Row) -> Result<Investment, rusqlite::Error> {
    Ok(Investment {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        symbol: row.get(2)?,
        quantity: row.get(3)?,
        last_price: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
