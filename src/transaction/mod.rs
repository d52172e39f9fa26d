//! Income and expense transactions, the core ledger of the app.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_transaction_endpoint;
pub use db::{
    create_transaction_table, delete_transaction, get_transaction, insert_transaction,
    list_transactions, update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{NewTransaction, Transaction, TransactionData, TransactionId, TransactionKind};
pub use edit::update_transaction_endpoint;
pub use list::{get_transaction_endpoint, list_transactions_endpoint};
