//! Handlers for the invoice routes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    card::CardId,
    invoice::{
        Invoice, InvoiceId, PaymentOutcome, PaymentRequest, get_invoice, list_card_invoices,
        pay_invoice,
    },
    purchase::{Purchase, list_invoice_purchases},
    user::UserID,
};

/// The state needed for the invoice endpoints.
#[derive(Debug, Clone)]
pub struct InvoiceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for InvoiceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List a card's invoices.
pub async fn list_card_invoices_endpoint(
    State(state): State<InvoiceEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(card_id): Path<CardId>,
) -> Result<Json<Vec<Invoice>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    list_card_invoices(card_id, user_id, &connection).map(Json)
}

/// Retrieve a single invoice.
pub async fn get_invoice_endpoint(
    State(state): State<InvoiceEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<Json<Invoice>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    get_invoice(invoice_id, user_id, &connection).map(Json)
}

/// List an invoice's purchases.
pub async fn list_invoice_purchases_endpoint(
    State(state): State<InvoiceEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<Json<Vec<Purchase>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    list_invoice_purchases(invoice_id, user_id, &connection).map(Json)
}

/// Apply a payment to an invoice.
pub async fn pay_invoice_endpoint(
    State(state): State<InvoiceEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(invoice_id): Path<InvoiceId>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentOutcome>, Error> {
    let mut connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    pay_invoice(invoice_id, user_id, &request, &mut connection).map(Json)
}

#[cfg(test)]
mod invoice_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::Path, extract::State};
    use rusqlite::Connection;

    use crate::{
        auth::PasswordHash,
        card::{CreditCardData, create_credit_card, create_credit_card_table},
        invoice::{InvoiceStatus, PaymentRequest, create_invoice_table, db::get_or_create_invoice},
        transaction::create_transaction_table,
        user::{UserID, create_user, create_user_table},
    };

    use super::{InvoiceEndpointState, pay_invoice_endpoint};

    fn get_state_user_and_invoice() -> (InvoiceEndpointState, UserID, i64) {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        create_credit_card_table(&connection).unwrap();
        create_invoice_table(&connection).unwrap();
        create_transaction_table(&connection).unwrap();
        let user = create_user(
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let card = create_credit_card(
            user.id,
            &CreditCardData {
                name: "Platinum".to_owned(),
                last_digits: String::new(),
                credit_limit: 5000.0,
                closing_day: 25,
                due_day: 5,
                color: String::new(),
                active: true,
            },
            &connection,
        )
        .unwrap();
        let invoice = get_or_create_invoice(card.id, 6, 2025, &connection).unwrap();
        connection
            .execute("UPDATE invoice SET total = 120.0 WHERE id = ?1", [invoice.id])
            .unwrap();

        (
            InvoiceEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
            invoice.id,
        )
    }

    #[tokio::test]
    async fn payment_endpoint_settles_invoice() {
        let (state, user_id, invoice_id) = get_state_user_and_invoice();

        let Json(outcome) = pay_invoice_endpoint(
            State(state),
            Extension(user_id),
            Path(invoice_id),
            Json(PaymentRequest {
                status: Some(InvoiceStatus::Paid),
                paid_amount: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(outcome.invoice.status, InvoiceStatus::Paid);
        assert_eq!(outcome.invoice.paid_amount, 120.0);
        assert!(outcome.transaction.is_some());
    }
}
