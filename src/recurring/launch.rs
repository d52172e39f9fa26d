//! Turns due recurring expenses into transactions, at most once per calendar
//! month each.

use rusqlite::Connection;
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    recurring::{RecurringExpenseId, get_recurring_expense, list_recurring_expenses},
    transaction::{NewTransaction, Transaction, TransactionKind, insert_transaction},
    user::UserID,
};

/// What a launch call produced.
#[derive(Debug, Serialize)]
pub struct LaunchOutcome {
    /// How many transactions were created.
    pub count: usize,
    /// The created transactions, one per launched expense.
    pub transactions: Vec<Transaction>,
}

/// Launch the user's due recurring expenses as expense transactions.
///
/// When `explicit_ids` is given, only those expenses are considered;
/// otherwise every recurring expense of the user is. An expense is due when
/// it is active and was not already launched in the month containing `now`:
/// the comparison is on the (month, year) pair of `last_launched_at`, not on
/// elapsed time, so calling twice in one calendar month creates nothing the
/// second time.
///
/// The created transaction is dated at min(due_day, last day of the month).
/// All writes happen in a single SQL transaction.
///
/// `now` is a parameter so tests can pin the calendar month.
///
/// # Errors
/// With `explicit_ids`, a missing id is [Error::NotFound] and another user's
/// id is [Error::Forbidden]; in both cases nothing is launched.
pub fn launch_due_expenses(
    user_id: UserID,
    explicit_ids: Option<&[RecurringExpenseId]>,
    now: OffsetDateTime,
    connection: &mut Connection,
) -> Result<LaunchOutcome, Error> {
    let sql_transaction = connection.transaction()?;

    let candidates = match explicit_ids {
        Some(ids) => ids
            .iter()
            .map(|id| get_recurring_expense(*id, user_id, &sql_transaction))
            .collect::<Result<Vec<_>, Error>>()?,
        None => list_recurring_expenses(user_id, &sql_transaction)?,
    };

    let mut transactions = Vec::new();

    for expense in candidates {
        if !expense.active || expense.launched_in_month_of(now) {
            continue;
        }

        let day = expense
            .due_day
            .min(time::util::days_in_year_month(now.year(), now.month()));
        let occurred_on = Date::from_calendar_date(now.year(), now.month(), day)
            .map_err(|error| Error::InvalidDate(error.to_string()))?;

        let transaction = insert_transaction(
            &NewTransaction {
                user_id,
                kind: TransactionKind::Expense,
                amount: expense.amount,
                category: expense.category.clone(),
                description: expense.description.clone(),
                occurred_on,
            },
            &sql_transaction,
        )?;

        sql_transaction.execute(
            "UPDATE recurring_expense SET last_launched_at = ?1 WHERE id = ?2",
            (now, expense.id),
        )?;

        transactions.push(transaction);
    }

    sql_transaction.commit()?;

    Ok(LaunchOutcome {
        count: transactions.len(),
        transactions,
    })
}
