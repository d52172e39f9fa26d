//! Database initialization: creates the schema and seeds the default
//! categories inside a single exclusive transaction.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    auth::create_password_reset_table,
    card::create_credit_card_table,
    category::{create_category_table, seed_default_categories},
    feedback::create_feedback_table,
    goal::{create_goal_contribution_table, create_goal_table},
    investment::create_investment_table,
    invoice::create_invoice_table,
    purchase::create_purchase_table,
    recurring::create_recurring_expense_table,
    template::create_template_table,
    transaction::create_transaction_table,
    user::create_user_table,
};

/// Create all application tables and seed the default categories.
///
/// Safe to call on an existing database: table creation is `IF NOT EXISTS`
/// and the defaults are only seeded when missing.
///
/// # Errors
/// Returns an error if the schema cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_user_table(&sql_transaction)?;
    create_password_reset_table(&sql_transaction)?;
    create_category_table(&sql_transaction)?;
    create_transaction_table(&sql_transaction)?;
    create_recurring_expense_table(&sql_transaction)?;
    create_goal_table(&sql_transaction)?;
    create_goal_contribution_table(&sql_transaction)?;
    create_credit_card_table(&sql_transaction)?;
    create_invoice_table(&sql_transaction)?;
    create_purchase_table(&sql_transaction)?;
    create_template_table(&sql_transaction)?;
    create_feedback_table(&sql_transaction)?;
    create_investment_table(&sql_transaction)?;

    seed_default_categories(&sql_transaction)?;

    sql_transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_succeeds_on_empty_database() {
        let connection = Connection::open_in_memory().unwrap();

        assert!(initialize(&connection).is_ok());
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();

        let default_count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM category WHERE is_default = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();

        // Seeding twice must not duplicate the default categories.
        assert!(default_count > 0);

        initialize(&connection).unwrap();
        let recount: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM category WHERE is_default = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(default_count, recount);
    }
}
