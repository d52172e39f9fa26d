//! The emergency fund suggestion estimator.
//!
//! Looks at the trailing six calendar months of spending (cash expenses plus
//! card purchases), averages it over the months actually covered, and
//! suggests a six month reserve.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time::{Date, Month, OffsetDateTime};

use crate::{
    AppState, Error,
    category::EMERGENCY_FUND_CATEGORY,
    goal::{FinancialGoal, list_goals},
    user::UserID,
};

/// How many months of spending feed the average, and how many months of
/// expenses the suggested reserve covers.
const WINDOW_MONTHS: i32 = 6;

/// The emergency fund suggestion for a user.
#[derive(Debug, Serialize)]
pub struct EmergencyFundReport {
    /// Average monthly spend over the window.
    pub average_monthly_expense: f64,
    /// The greater of the average and the active recurring commitments.
    pub estimated_monthly_expense: f64,
    /// Six months of the estimated monthly expense.
    pub suggested_target: f64,
    /// How many distinct months of data backed the average.
    pub months_considered: u32,
    /// The user's existing emergency fund goal, when one exists.
    pub goal: Option<FinancialGoal>,
}

/// Build the emergency fund report for `user_id` as of `now`.
pub fn emergency_fund_report(
    user_id: UserID,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<EmergencyFundReport, Error> {
    let window_start = window_start(now)?;

    let expense_total: f64 = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM \"transaction\"
         WHERE user_id = :user_id AND kind = 'expense' AND occurred_on >= :start",
        rusqlite::named_params! {":user_id": user_id.as_i64(), ":start": window_start},
        |row| row.get(0),
    )?;

    let purchase_total: f64 = connection.query_row(
        "SELECT COALESCE(SUM(purchase.value), 0)
         FROM purchase
         JOIN invoice ON purchase.invoice_id = invoice.id
         JOIN credit_card ON invoice.card_id = credit_card.id
         WHERE credit_card.user_id = :user_id AND purchase.date >= :start",
        rusqlite::named_params! {":user_id": user_id.as_i64(), ":start": window_start},
        |row| row.get(0),
    )?;

    // Dates are stored as ISO-8601 text, so the first seven characters are
    // the year and month.
    let months_covered: u32 = connection.query_row(
        "SELECT COUNT(*) FROM (
             SELECT substr(occurred_on, 1, 7) AS period FROM \"transaction\"
             WHERE user_id = :user_id AND kind = 'expense' AND occurred_on >= :start
             UNION
             SELECT substr(purchase.date, 1, 7)
             FROM purchase
             JOIN invoice ON purchase.invoice_id = invoice.id
             JOIN credit_card ON invoice.card_id = credit_card.id
             WHERE credit_card.user_id = :user_id AND purchase.date >= :start
         )",
        rusqlite::named_params! {":user_id": user_id.as_i64(), ":start": window_start},
        |row| row.get(0),
    )?;

    let recurring_total: f64 = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM recurring_expense
         WHERE user_id = :user_id AND active = 1",
        rusqlite::named_params! {":user_id": user_id.as_i64()},
        |row| row.get(0),
    )?;

    let months_considered = months_covered.clamp(1, WINDOW_MONTHS as u32);
    let average = round((expense_total + purchase_total) / months_considered as f64);
    let estimated = average.max(round(recurring_total));
    let suggested = round(WINDOW_MONTHS as f64 * estimated);

    let goal = list_goals(user_id, connection)?
        .into_iter()
        .find(|goal| goal.category == EMERGENCY_FUND_CATEGORY);

    Ok(EmergencyFundReport {
        average_monthly_expense: average,
        estimated_monthly_expense: estimated,
        suggested_target: suggested,
        months_considered,
        goal,
    })
}

/// The first day of the calendar month five months before `now`, so the
/// window spans six months including the current one.
fn window_start(now: OffsetDateTime) -> Result<Date, Error> {
    let total = now.year() * 12 + i32::from(u8::from(now.month())) - 1 - (WINDOW_MONTHS - 1);
    let year = total.div_euclid(12);
    let month = Month::try_from((total.rem_euclid(12) + 1) as u8)
        .map_err(|error| Error::InvalidDate(error.to_string()))?;

    Date::from_calendar_date(year, month, 1).map_err(|error| Error::InvalidDate(error.to_string()))
}

fn round(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The state needed for the emergency fund endpoint.
#[derive(Debug, Clone)]
pub struct ReportEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Retrieve the user's emergency fund suggestion.
pub async fn get_emergency_fund_endpoint(
    State(state): State<ReportEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<EmergencyFundReport>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    emergency_fund_report(user_id, OffsetDateTime::now_utc(), &connection).map(Json)
}
