//! Handlers for the investment routes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    investment::{
        Investment, InvestmentData, InvestmentId, QuoteProvider, RefreshOutcome,
        create_investment, delete_investment, list_investments, refresh_quotes,
    },
    user::UserID,
};

/// The state needed for the investment endpoints.
#[derive(Clone)]
pub struct InvestmentEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub quote_provider: Arc<dyn QuoteProvider>,
}

impl FromRef<AppState> for InvestmentEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            quote_provider: state.quote_provider.clone(),
        }
    }
}

/// List the user's positions.
pub async fn list_investments_endpoint(
    State(state): State<InvestmentEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Investment>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    list_investments(user_id, &connection).map(Json)
}

/// Add a position.
pub async fn create_investment_endpoint(
    State(state): State<InvestmentEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<InvestmentData>,
) -> Result<(StatusCode, Json<Investment>), Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let investment = create_investment(user_id, &data, &connection)?;

    Ok((StatusCode::CREATED, Json(investment)))
}

/// Remove a position.
pub async fn delete_investment_endpoint(
    State(state): State<InvestmentEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(investment_id): Path<InvestmentId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    delete_investment(investment_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Refresh the stored quotes for every position.
///
/// A cron-style job route: it serves no particular user and sits outside the
/// session guard. The provider does blocking HTTP, so the whole batch runs
/// on the blocking thread pool.
pub async fn refresh_quotes_endpoint(
    State(state): State<InvestmentEndpointState>,
) -> Result<Json<RefreshOutcome>, Error> {
    let db_connection = state.db_connection.clone();
    let quote_provider = state.quote_provider.clone();

    let outcome =
        tokio::task::spawn_blocking(move || refresh_quotes(quote_provider.as_ref(), &db_connection))
            .await
            .map_err(|error| Error::QuoteProvider(error.to_string()))??;

    Ok(Json(outcome))
}
