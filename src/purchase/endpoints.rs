//! Handlers for the purchase routes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    purchase::{Purchase, PurchaseData, PurchaseId, create_purchase, delete_purchase},
    user::UserID,
};

/// The state needed for the purchase endpoints.
#[derive(Debug, Clone)]
pub struct PurchaseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PurchaseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Record a purchase, returning one row per installment.
pub async fn create_purchase_endpoint(
    State(state): State<PurchaseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<PurchaseData>,
) -> Result<(StatusCode, Json<Vec<Purchase>>), Error> {
    let mut connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    let purchases = create_purchase(user_id, &data, &mut connection)?;

    Ok((StatusCode::CREATED, Json(purchases)))
}

/// Delete a purchase and, for installment plans, its whole group.
pub async fn delete_purchase_endpoint(
    State(state): State<PurchaseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(purchase_id): Path<PurchaseId>,
) -> Result<StatusCode, Error> {
    let mut connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    delete_purchase(purchase_id, user_id, &mut connection)?;

    Ok(StatusCode::NO_CONTENT)
}
