//! Handlers for the credit card routes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    card::{
        CardId, CreditCard, CreditCardData, create_credit_card, delete_credit_card,
        get_credit_card, list_credit_cards, update_credit_card,
    },
    user::UserID,
};

/// The state needed for the credit card endpoints.
#[derive(Debug, Clone)]
pub struct CardEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CardEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the user's credit cards.
pub async fn list_cards_endpoint(
    State(state): State<CardEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<CreditCard>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    list_credit_cards(user_id, &connection).map(Json)
}

/// Create a credit card.
pub async fn create_card_endpoint(
    State(state): State<CardEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<CreditCardData>,
) -> Result<(StatusCode, Json<CreditCard>), Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let card = create_credit_card(user_id, &data, &connection)?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// Retrieve a single credit card.
pub async fn get_card_endpoint(
    State(state): State<CardEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(card_id): Path<CardId>,
) -> Result<Json<CreditCard>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    get_credit_card(card_id, user_id, &connection).map(Json)
}

/// Update a credit card.
pub async fn update_card_endpoint(
    State(state): State<CardEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(card_id): Path<CardId>,
    Json(data): Json<CreditCardData>,
) -> Result<Json<CreditCard>, Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    update_credit_card(card_id, user_id, &data, &connection).map(Json)
}

/// Delete a credit card.
pub async fn delete_card_endpoint(
    State(state): State<CardEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(card_id): Path<CardId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    delete_credit_card(card_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
