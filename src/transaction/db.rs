//! Database operations for transactions.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    pagination::{PaginationConfig, PaginationParams},
    transaction::{NewTransaction, Transaction, TransactionData, TransactionId, TransactionKind},
    user::UserID,
};

/// Create the transaction table and its indexes.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            kind TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            occurred_on TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date
            ON \"transaction\"(user_id, occurred_on);",
    )?;

    Ok(())
}

/// Insert a validated transaction and return it with its generated ID.
///
/// Works on plain connections and inside SQL transactions, so the launcher
/// and the invoice payment allocator can reuse it.
pub fn insert_transaction(
    new: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO \"transaction\"
         (user_id, kind, amount, category, description, occurred_on, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            new.user_id.as_i64(),
            new.kind.as_str(),
            new.amount,
            &new.category,
            &new.description,
            new.occurred_on,
            created_at,
        ),
    )?;

    Ok(Transaction {
        id: connection.last_insert_rowid(),
        user_id: new.user_id,
        kind: new.kind,
        amount: new.amount,
        category: new.category.clone(),
        description: new.description.clone(),
        occurred_on: new.occurred_on,
        created_at,
    })
}

/// Retrieve a single transaction owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] for a missing row and [Error::Forbidden] when the
/// transaction belongs to another user.
pub fn get_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, user_id, kind, amount, category, description, occurred_on, created_at
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &transaction_id)], map_row)?;

    if transaction.user_id != user_id {
        return Err(Error::Forbidden);
    }

    Ok(transaction)
}

/// Update a transaction's fields.
pub fn update_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    data: &TransactionData,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let existing = get_transaction(transaction_id, user_id, connection)?;
    let occurred_on = data.occurred_on.unwrap_or(existing.occurred_on);

    connection.execute(
        "UPDATE \"transaction\"
         SET kind = ?1, amount = ?2, category = ?3, description = ?4, occurred_on = ?5
         WHERE id = ?6",
        (
            data.kind.as_str(),
            data.amount,
            data.category.trim(),
            &data.description,
            occurred_on,
            transaction_id,
        ),
    )?;

    Ok(Transaction {
        kind: data.kind,
        amount: data.amount,
        category: data.category.trim().to_owned(),
        description: data.description.clone(),
        occurred_on,
        ..existing
    })
}

/// Delete a transaction owned by `user_id`.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    get_transaction(transaction_id, user_id, connection)?;

    connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [transaction_id])?;

    Ok(())
}

/// Retrieve one page of the user's transactions, newest first, along with the
/// total row count.
pub fn list_transactions(
    user_id: UserID,
    params: &PaginationParams,
    config: &PaginationConfig,
    connection: &Connection,
) -> Result<(Vec<Transaction>, u64), Error> {
    let total = connection.query_row(
        "SELECT COUNT(*) FROM \"transaction\" WHERE user_id = :user_id",
        &[(":user_id", &user_id.as_i64())],
        |row| row.get::<_, i64>(0),
    )? as u64;

    let (_, page_size) = params.resolve(config);
    let (limit, offset) = if params.is_paged() {
        (page_size as i64, params.offset(config) as i64)
    } else {
        (-1, 0)
    };

    let transactions = connection
        .prepare(
            "SELECT id, user_id, kind, amount, category, description, occurred_on, created_at
             FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY occurred_on DESC, id DESC
             LIMIT :limit OFFSET :offset",
        )?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":limit": limit,
                ":offset": offset,
            },
            map_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect::<Result<Vec<_>, Error>>()?;

    Ok((transactions, total))
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_kind: String = row.get(2)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        kind: TransactionKind::from_str(&raw_kind),
        amount: row.get(3)?,
        category: row.get(4)?,
        description: row.get(5)?,
        occurred_on: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
pub(crate) mod test_utils {
    use rusqlite::Connection;

    use crate::{
        auth::PasswordHash,
        user::{UserID, create_user, create_user_table},
    };

    use super::create_transaction_table;

    /// An in-memory database with the user and transaction tables, and one user.
    pub(crate) fn get_connection_and_user() -> (Connection, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        create_transaction_table(&connection).unwrap();
        let user = create_user(
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (connection, user.id)
    }
}

#[cfg(test)]
mod transaction_db_tests {
    use time::{Date, Month};

    use crate::{
        Error,
        auth::PasswordHash,
        pagination::{PaginationConfig, PaginationParams},
        transaction::{NewTransaction, TransactionData, TransactionKind},
        user::create_user,
    };

    use super::{
        delete_transaction, get_transaction, insert_transaction, list_transactions,
        test_utils::get_connection_and_user, update_transaction,
    };

    fn new_expense(user_id: crate::user::UserID, amount: f64, day: u8) -> NewTransaction {
        NewTransaction {
            user_id,
            kind: TransactionKind::Expense,
            amount,
            category: "Mercado".to_owned(),
            description: "groceries".to_owned(),
            occurred_on: Date::from_calendar_date(2026, Month::March, day).unwrap(),
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let (connection, user_id) = get_connection_and_user();

        let inserted = insert_transaction(&new_expense(user_id, 42.5, 10), &connection).unwrap();
        let fetched = get_transaction(inserted.id, user_id, &connection).unwrap();

        assert_eq!(inserted, fetched);
    }

    #[test]
    fn get_missing_transaction_returns_not_found() {
        let (connection, user_id) = get_connection_and_user();

        assert_eq!(
            get_transaction(999, user_id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn get_other_users_transaction_is_forbidden() {
        let (connection, user_id) = get_connection_and_user();
        let other = create_user(
            "other@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let inserted = insert_transaction(&new_expense(other.id, 10.0, 1), &connection).unwrap();

        assert_eq!(
            get_transaction(inserted.id, user_id, &connection),
            Err(Error::Forbidden)
        );
    }

    #[test]
    fn update_overwrites_fields() {
        let (connection, user_id) = get_connection_and_user();
        let inserted = insert_transaction(&new_expense(user_id, 42.5, 10), &connection).unwrap();

        let data = TransactionData {
            kind: TransactionKind::Income,
            amount: 100.0,
            category: "Salário".to_owned(),
            description: "bonus".to_owned(),
            occurred_on: None,
        };
        let updated = update_transaction(inserted.id, user_id, &data, &connection).unwrap();

        assert_eq!(updated.kind, TransactionKind::Income);
        assert_eq!(updated.amount, 100.0);
        // Omitted date keeps the original.
        assert_eq!(updated.occurred_on, inserted.occurred_on);
        assert_eq!(
            get_transaction(inserted.id, user_id, &connection).unwrap(),
            updated
        );
    }

    #[test]
    fn delete_removes_row() {
        let (connection, user_id) = get_connection_and_user();
        let inserted = insert_transaction(&new_expense(user_id, 42.5, 10), &connection).unwrap();

        delete_transaction(inserted.id, user_id, &connection).unwrap();

        assert_eq!(
            get_transaction(inserted.id, user_id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn list_orders_newest_first_and_reports_total() {
        let (connection, user_id) = get_connection_and_user();
        insert_transaction(&new_expense(user_id, 1.0, 1), &connection).unwrap();
        insert_transaction(&new_expense(user_id, 2.0, 15), &connection).unwrap();
        insert_transaction(&new_expense(user_id, 3.0, 7), &connection).unwrap();

        let (transactions, total) = list_transactions(
            user_id,
            &PaginationParams::default(),
            &PaginationConfig::default(),
            &connection,
        )
        .unwrap();

        assert_eq!(total, 3);
        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].amount, 2.0);
        assert_eq!(transactions[2].amount, 1.0);
    }

    #[test]
    fn list_pages_results() {
        let (connection, user_id) = get_connection_and_user();
        for day in 1..=5 {
            insert_transaction(&new_expense(user_id, day as f64, day), &connection).unwrap();
        }

        let params = PaginationParams {
            page: Some(2),
            page_size: Some(2),
        };
        let (transactions, total) = list_transactions(
            user_id,
            &params,
            &PaginationConfig::default(),
            &connection,
        )
        .unwrap();

        assert_eq!(total, 5);
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].amount, 3.0);
    }
}
