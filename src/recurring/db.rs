//! Database operations for recurring expenses.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    recurring::{RecurringExpense, RecurringExpenseData, RecurringExpenseId},
    user::UserID,
};

/// Create the recurring expense table.
pub fn create_recurring_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurring_expense (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                due_day INTEGER NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                last_launched_at TEXT,
                notes TEXT NOT NULL DEFAULT '',
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Create a recurring expense and return it with its generated ID.
pub fn create_recurring_expense(
    user_id: UserID,
    data: &RecurringExpenseData,
    connection: &Connection,
) -> Result<RecurringExpense, Error> {
    connection.execute(
        "INSERT INTO recurring_expense
         (user_id, description, amount, category, due_day, active, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            user_id.as_i64(),
            data.description.trim(),
            data.amount,
            data.category.trim(),
            data.due_day,
            data.active,
            &data.notes,
        ),
    )?;

    Ok(RecurringExpense {
        id: connection.last_insert_rowid(),
        user_id,
        description: data.description.trim().to_owned(),
        amount: data.amount,
        category: data.category.trim().to_owned(),
        due_day: data.due_day,
        active: data.active,
        last_launched_at: None,
        notes: data.notes.clone(),
    })
}

/// Retrieve a single recurring expense owned by `user_id`.
pub fn get_recurring_expense(
    expense_id: RecurringExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RecurringExpense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, user_id, description, amount, category, due_day, active,
                    last_launched_at, notes
             FROM recurring_expense WHERE id = :id",
        )?
        .query_row(&[(":id", &expense_id)], map_row)?;

    if expense.user_id != user_id {
        return Err(Error::Forbidden);
    }

    Ok(expense)
}

/// Retrieve all of the user's recurring expenses ordered by due day.
pub fn list_recurring_expenses(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<RecurringExpense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, description, amount, category, due_day, active,
                    last_launched_at, notes
             FROM recurring_expense
             WHERE user_id = :user_id
             ORDER BY due_day ASC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Update a recurring expense's fields. The launch timestamp is untouched.
pub fn update_recurring_expense(
    expense_id: RecurringExpenseId,
    user_id: UserID,
    data: &RecurringExpenseData,
    connection: &Connection,
) -> Result<RecurringExpense, Error> {
    let existing = get_recurring_expense(expense_id, user_id, connection)?;

    connection.execute(
        "UPDATE recurring_expense
         SET description = ?1, amount = ?2, category = ?3, due_day = ?4, active = ?5, notes = ?6
         WHERE id = ?7",
        (
            data.description.trim(),
            data.amount,
            data.category.trim(),
            data.due_day,
            data.active,
            &data.notes,
            expense_id,
        ),
    )?;

    Ok(RecurringExpense {
        description: data.description.trim().to_owned(),
        amount: data.amount,
        category: data.category.trim().to_owned(),
        due_day: data.due_day,
        active: data.active,
        notes: data.notes.clone(),
        ..existing
    })
}

/// Delete a recurring expense owned by `user_id`.
pub fn delete_recurring_expense(
    expense_id: RecurringExpenseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    get_recurring_expense(expense_id, user_id, connection)?;

    connection.execute("DELETE FROM recurring_expense WHERE id = ?1", [expense_id])?;

    Ok(())
}

fn map_row(row: &Row) -> Result<RecurringExpense, rusqlite::Error> {
    Ok(RecurringExpense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        due_day: row.get(5)?,
        active: row.get(6)?,
        last_launched_at: row.get(7)?,
        notes: row.get(8)?,
    })
}

#[cfg(test)]
mod recurring_expense_db_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::PasswordHash,
        recurring::RecurringExpenseData,
        user::{UserID, create_user, create_user_table},
    };

    use super::{
        create_recurring_expense, create_recurring_expense_table, delete_recurring_expense,
        get_recurring_expense, list_recurring_expenses, update_recurring_expense,
    };

    pub(crate) fn get_connection_and_user() -> (Connection, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        create_recurring_expense_table(&connection).unwrap();
        let user = create_user(
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (connection, user.id)
    }

    fn rent() -> RecurringExpenseData {
        RecurringExpenseData {
            description: "Rent".to_owned(),
            amount: 1200.0,
            category: "Moradia".to_owned(),
            due_day: 5,
            active: true,
            notes: String::new(),
        }
    }

    #[test]
    fn create_and_get_round_trip() {
        let (connection, user_id) = get_connection_and_user();

        let created = create_recurring_expense(user_id, &rent(), &connection).unwrap();
        let fetched = get_recurring_expense(created.id, user_id, &connection).unwrap();

        assert_eq!(created, fetched);
        assert!(fetched.last_launched_at.is_none());
    }

    #[test]
    fn update_preserves_launch_timestamp() {
        let (connection, user_id) = get_connection_and_user();
        let created = create_recurring_expense(user_id, &rent(), &connection).unwrap();
        connection
            .execute(
                "UPDATE recurring_expense SET last_launched_at = ?1 WHERE id = ?2",
                (time::OffsetDateTime::now_utc(), created.id),
            )
            .unwrap();

        let data = RecurringExpenseData {
            amount: 1300.0,
            ..rent()
        };
        update_recurring_expense(created.id, user_id, &data, &connection).unwrap();

        let fetched = get_recurring_expense(created.id, user_id, &connection).unwrap();
        assert_eq!(fetched.amount, 1300.0);
        assert!(fetched.last_launched_at.is_some());
    }

    #[test]
    fn delete_removes_row() {
        let (connection, user_id) = get_connection_and_user();
        let created = create_recurring_expense(user_id, &rent(), &connection).unwrap();

        delete_recurring_expense(created.id, user_id, &connection).unwrap();

        assert_eq!(
            get_recurring_expense(created.id, user_id, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn list_is_ordered_by_due_day() {
        let (connection, user_id) = get_connection_and_user();
        create_recurring_expense(
            user_id,
            &RecurringExpenseData {
                due_day: 20,
                ..rent()
            },
            &connection,
        )
        .unwrap();
        create_recurring_expense(
            user_id,
            &RecurringExpenseData {
                due_day: 3,
                ..rent()
            },
            &connection,
        )
        .unwrap();

        let expenses = list_recurring_expenses(user_id, &connection).unwrap();

        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].due_day, 3);
        assert_eq!(expenses[1].due_day, 20);
    }
}
