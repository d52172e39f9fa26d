//! Password reset with single-use, time-limited opaque tokens.
//!
//! Requesting a reset issues a token delivered through a [MailSender].
//! Redeeming a token invalidates every other unused token for that user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    AppState, Error,
    auth::{PasswordHash, ValidatedPassword},
    user::{UserID, get_user_by_email, set_user_password},
};

/// How long a reset token stays valid after being issued.
pub const RESET_TOKEN_DURATION: Duration = Duration::minutes(30);

/// Delivers password reset tokens to users.
///
/// Email transport is an external collaborator; the default implementation
/// only logs the token so operators can relay it manually during development.
pub trait MailSender: Send + Sync {
    /// Send `token` to `email` as a reset link.
    fn send_password_reset(&self, email: &str, token: &str) -> Result<(), Error>;
}

/// A [MailSender] that writes the reset token to the application log.
pub struct LogMailSender;

impl MailSender for LogMailSender {
    fn send_password_reset(&self, email: &str, token: &str) -> Result<(), Error> {
        tracing::info!("password reset requested for {email}: token {token}");
        Ok(())
    }
}

/// Create the password reset token table.
pub fn create_password_reset_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS password_reset_token (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                token TEXT NOT NULL UNIQUE,
                expires_at TEXT NOT NULL,
                used INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Issue a new reset token for `user_id` valid for [RESET_TOKEN_DURATION].
pub fn issue_reset_token(user_id: UserID, connection: &Connection) -> Result<String, Error> {
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let expires_at = OffsetDateTime::now_utc() + RESET_TOKEN_DURATION;

    connection.execute(
        "INSERT INTO password_reset_token (user_id, token, expires_at) VALUES (?1, ?2, ?3)",
        (user_id.as_i64(), &token, expires_at),
    )?;

    Ok(token)
}

/// Redeem `token`, setting the user's password to `new_password_hash`.
///
/// All of the user's unused tokens are marked used inside the same SQL
/// transaction, so a redeemed or superseded token can never be replayed.
///
/// # Errors
///
/// Returns [Error::InvalidResetToken] when the token is unknown, already
/// used, or expired.
pub fn redeem_reset_token(
    token: &str,
    new_password_hash: &PasswordHash,
    connection: &mut Connection,
) -> Result<UserID, Error> {
    let sql_transaction = connection.transaction()?;

    let (user_id, expires_at): (i64, OffsetDateTime) = sql_transaction
        .prepare(
            "SELECT user_id, expires_at FROM password_reset_token
             WHERE token = :token AND used = 0",
        )?
        .query_row(&[(":token", &token)], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::InvalidResetToken,
            error => error.into(),
        })?;

    if expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::InvalidResetToken);
    }

    let user_id = UserID::new(user_id);
    sql_transaction.execute(
        "UPDATE password_reset_token SET used = 1 WHERE user_id = ?1",
        [user_id.as_i64()],
    )?;
    set_user_password(user_id, new_password_hash, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(user_id)
}

/// The state needed for the password reset endpoints.
#[derive(Clone)]
pub struct PasswordResetState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub mail_sender: Arc<dyn MailSender>,
}

impl FromRef<AppState> for PasswordResetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            mail_sender: state.mail_sender.clone(),
        }
    }
}

/// The email address asking for a reset link.
#[derive(Debug, Serialize, Deserialize)]
pub struct ForgotPasswordData {
    pub email: String,
}

/// The token and replacement password sent to redeem a reset.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResetPasswordData {
    pub token: String,
    pub new_password: String,
}

/// Handle a forgot-password request.
///
/// Always responds with the same message whether or not the email is
/// registered, so the endpoint cannot be used to probe for accounts.
pub async fn post_forgot_password(
    State(state): State<PasswordResetState>,
    Json(data): Json<ForgotPasswordData>,
) -> Result<Json<Value>, Error> {
    let token = {
        let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

        match get_user_by_email(data.email.trim(), &connection) {
            Ok(user) => Some(issue_reset_token(user.id, &connection)?),
            Err(Error::NotFound) => None,
            Err(error) => return Err(error),
        }
    };

    if let Some(token) = token {
        state.mail_sender.send_password_reset(&data.email, &token)?;
    }

    Ok(Json(json!({
        "message": "if the email is registered, a reset link has been sent"
    })))
}

/// Handle a reset-password request, redeeming the token.
pub async fn post_reset_password(
    State(state): State<PasswordResetState>,
    Json(data): Json<ResetPasswordData>,
) -> Result<Json<Value>, Error> {
    let password = ValidatedPassword::new(&data.new_password)?;
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let mut connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    redeem_reset_token(&data.token, &password_hash, &mut connection)?;

    Ok(Json(json!({ "success": true })))
}
