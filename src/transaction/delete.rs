//! Handler for deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    transaction::{TransactionId, create::TransactionEndpointState, delete_transaction},
    user::UserID,
};

/// Handle transaction deletion.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    delete_transaction(transaction_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::Path, extract::State, http::StatusCode};
    use time::{Date, Month};

    use crate::{
        Error,
        transaction::{
            NewTransaction, TransactionKind, create::TransactionEndpointState,
            db::test_utils::get_connection_and_user, insert_transaction,
        },
    };

    use super::delete_transaction_endpoint;

    #[tokio::test]
    async fn delete_returns_no_content() {
        let (connection, user_id) = get_connection_and_user();
        let transaction = insert_transaction(
            &NewTransaction {
                user_id,
                kind: TransactionKind::Expense,
                amount: 10.0,
                category: "Mercado".to_owned(),
                description: String::new(),
                occurred_on: Date::from_calendar_date(2026, Month::March, 1).unwrap(),
            },
            &connection,
        )
        .unwrap();
        let state = TransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let status =
            delete_transaction_endpoint(State(state), Extension(user_id), Path(transaction.id))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_missing_transaction_returns_not_found() {
        let (connection, user_id) = get_connection_and_user();
        let state = TransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = delete_transaction_endpoint(State(state), Extension(user_id), Path(999)).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }
}
