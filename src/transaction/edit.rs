//! Handler for editing a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    Error,
    transaction::{
        Transaction, TransactionData, TransactionId, create::TransactionEndpointState,
        update_transaction,
    },
    user::UserID,
};

/// Handle transaction updates.
///
/// An omitted `occurred_on` keeps the stored date.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
    Json(data): Json<TransactionData>,
) -> Result<Json<Transaction>, Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    update_transaction(transaction_id, user_id, &data, &connection).map(Json)
}

#[cfg(test)]
mod update_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::Path, extract::State};
    use time::{Date, Month};

    use crate::{
        Error,
        auth::PasswordHash,
        transaction::{
            NewTransaction, TransactionData, TransactionKind, create::TransactionEndpointState,
            db::test_utils::get_connection_and_user, insert_transaction,
        },
        user::create_user,
    };

    use super::update_transaction_endpoint;

    #[tokio::test]
    async fn updating_another_users_transaction_is_forbidden() {
        let (connection, user_id) = get_connection_and_user();
        let other = create_user(
            "other@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let theirs = insert_transaction(
            &NewTransaction {
                user_id: other.id,
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
        let data = TransactionData {
            kind: TransactionKind::Expense,
            amount: 1.0,
            category: "Mercado".to_owned(),
            description: String::new(),
            occurred_on: None,
        };

        let result = update_transaction_endpoint(
            State(state),
            Extension(user_id),
            Path(theirs.id),
            Json(data),
        )
        .await;

        assert!(matches!(result, Err(Error::Forbidden)));
    }
}
