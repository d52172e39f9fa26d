//! Handlers for listing and fetching transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    pagination::{Page, PaginationConfig, PaginationParams},
    transaction::{Transaction, TransactionId, get_transaction, list_transactions},
    user::UserID,
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    pub pagination_config: PaginationConfig,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            pagination_config: state.pagination_config.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the user's transactions, newest first.
///
/// Returns a bare array, or a [Page] envelope when `page` or `page_size`
/// query parameters are supplied.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(user_id): Extension<UserID>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    let (transactions, total) =
        list_transactions(user_id, &params, &state.pagination_config, &connection)?;

    if params.is_paged() {
        let page = Page::new(transactions, &params, &state.pagination_config, total);
        Ok(Json(page).into_response())
    } else {
        Ok(Json(transactions).into_response())
    }
}

/// Fetch a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<ListTransactionsState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    get_transaction(transaction_id, user_id, &connection).map(Json)
}
