//! Recurring monthly expenses and the launcher that turns due ones into
//! transactions.

mod db;
mod domain;
mod endpoints;
mod launch;

pub use db::{
    create_recurring_expense, create_recurring_expense_table, delete_recurring_expense,
    get_recurring_expense, list_recurring_expenses, update_recurring_expense,
};
pub use domain::{RecurringExpense, RecurringExpenseData, RecurringExpenseId};
pub use endpoints::{
    create_recurring_expense_endpoint, delete_recurring_expense_endpoint,
    launch_recurring_expenses_endpoint, list_recurring_expenses_endpoint,
    update_recurring_expense_endpoint,
};
pub use launch::{LaunchOutcome, launch_due_expenses};
