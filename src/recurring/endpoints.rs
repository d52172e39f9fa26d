//! Handlers for the recurring expense routes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    recurring::{
        LaunchOutcome, RecurringExpense, RecurringExpenseData, RecurringExpenseId,
        create_recurring_expense, delete_recurring_expense, launch_due_expenses,
        list_recurring_expenses, update_recurring_expense,
    },
    user::UserID,
};

/// The state needed for the recurring expense endpoints.
#[derive(Debug, Clone)]
pub struct RecurringExpenseEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecurringExpenseEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the user's recurring expenses.
pub async fn list_recurring_expenses_endpoint(
    State(state): State<RecurringExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<RecurringExpense>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    list_recurring_expenses(user_id, &connection).map(Json)
}

/// Create a recurring expense.
pub async fn create_recurring_expense_endpoint(
    State(state): State<RecurringExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<RecurringExpenseData>,
) -> Result<(StatusCode, Json<RecurringExpense>), Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let expense = create_recurring_expense(user_id, &data, &connection)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// Update a recurring expense.
pub async fn update_recurring_expense_endpoint(
    State(state): State<RecurringExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<RecurringExpenseId>,
    Json(data): Json<RecurringExpenseData>,
) -> Result<Json<RecurringExpense>, Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    update_recurring_expense(expense_id, user_id, &data, &connection).map(Json)
}

/// Delete a recurring expense.
pub async fn delete_recurring_expense_endpoint(
    State(state): State<RecurringExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(expense_id): Path<RecurringExpenseId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    delete_recurring_expense(expense_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// The optional request body for the launch endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LaunchRequest {
    /// Launch only these expenses. Omitted means all of the user's expenses.
    pub expense_ids: Option<Vec<RecurringExpenseId>>,
}

/// Launch the user's due recurring expenses as transactions.
pub async fn launch_recurring_expenses_endpoint(
    State(state): State<RecurringExpenseEndpointState>,
    Extension(user_id): Extension<UserID>,
    body: Option<Json<LaunchRequest>>,
) -> Result<Json<LaunchOutcome>, Error> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let mut connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    launch_due_expenses(
        user_id,
        request.expense_ids.as_deref(),
        OffsetDateTime::now_utc(),
        &mut connection,
    )
    .map(Json)
}
