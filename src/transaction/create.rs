//! Handler for creating a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{NewTransaction, Transaction, TransactionData, insert_transaction},
    user::UserID,
};

/// The state needed for the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle transaction creation.
///
/// # Errors
/// Returns a validation error for a non-positive amount or blank category.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<TransactionData>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let new_transaction = NewTransaction::from_data(user_id, &data)?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let transaction = insert_transaction(&new_transaction, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::{Date, Month};

    use crate::{
        Error,
        auth::PasswordHash,
        transaction::{TransactionData, TransactionKind, create_transaction_table},
        user::{UserID, create_user, create_user_table},
    };

    use super::{TransactionEndpointState, create_transaction_endpoint};

    fn get_state_and_user() -> (TransactionEndpointState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        create_transaction_table(&connection).unwrap();
        let user = create_user(
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (
            TransactionEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    #[tokio::test]
    async fn create_returns_created_transaction() {
        let (state, user_id) = get_state_and_user();
        let occurred_on = Date::from_calendar_date(2026, Month::March, 10).unwrap();
        let data = TransactionData {
            kind: TransactionKind::Expense,
            amount: 19.9,
            category: "Mercado".to_owned(),
            description: "bread".to_owned(),
            occurred_on: Some(occurred_on),
        };

        let (status, Json(transaction)) =
            create_transaction_endpoint(State(state), Extension(user_id), Json(data))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(transaction.id > 0);
        assert_eq!(transaction.user_id, user_id);
        assert_eq!(transaction.occurred_on, occurred_on);
    }

    #[tokio::test]
    async fn create_rejects_non_positive_amount() {
        let (state, user_id) = get_state_and_user();
        let data = TransactionData {
            kind: TransactionKind::Expense,
            amount: -5.0,
            category: "Mercado".to_owned(),
            description: String::new(),
            occurred_on: None,
        };

        let result = create_transaction_endpoint(State(state), Extension(user_id), Json(data)).await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
