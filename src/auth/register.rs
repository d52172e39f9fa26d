//! Handler for registering a new user account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{PasswordHash, ValidatedPassword, log_in::SessionUser},
    user::create_user,
};

/// The state needed for registering a user.
#[derive(Debug, Clone)]
pub struct RegisterState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data sent by the client to create an account.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterData {
    pub email: String,
    pub password: String,
}

/// Handle account creation.
///
/// # Errors
///
/// - Malformed email or a too-short password produce a validation error.
/// - An already registered email produces [Error::DuplicateEmail].
pub async fn register_user(
    State(state): State<RegisterState>,
    Json(data): Json<RegisterData>,
) -> Result<(StatusCode, Json<SessionUser>), Error> {
    let email = data.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::validation(
            "email",
            "invalid",
            "a valid email address is required",
        ));
    }

    let password = ValidatedPassword::new(&data.password)?;
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let user = create_user(email, password_hash, &connection)?;

    Ok((StatusCode::CREATED, Json(SessionUser::from(&user))))
}

#[cfg(test)]
mod register_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;

    use crate::{Error, user::create_user_table};

    use super::{RegisterData, RegisterState, register_user};

    fn get_register_state() -> RegisterState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        RegisterState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn register_creates_user() {
        let state = get_register_state();
        let data = RegisterData {
            email: "foo@bar.baz".to_owned(),
            password: "longenoughpassword".to_owned(),
        };

        let (status, Json(user)) = register_user(State(state), Json(data))
            .await
            .expect("Expected successful registration");

        assert_eq!(status, axum::http::StatusCode::CREATED);
        assert_eq!(user.email, "foo@bar.baz");
    }

    #[tokio::test]
    async fn register_rejects_malformed_email() {
        let state = get_register_state();
        let data = RegisterData {
            email: "not-an-email".to_owned(),
            password: "longenoughpassword".to_owned(),
        };

        let result = register_user(State(state), Json(data)).await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let state = get_register_state();
        let data = RegisterData {
            email: "foo@bar.baz".to_owned(),
            password: "short".to_owned(),
        };

        let result = register_user(State(state), Json(data)).await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let state = get_register_state();
        let data = RegisterData {
            email: "foo@bar.baz".to_owned(),
            password: "longenoughpassword".to_owned(),
        };
        register_user(State(state.clone()), Json(data)).await.unwrap();

        let duplicate = RegisterData {
            email: "foo@bar.baz".to_owned(),
            password: "anotherpassword".to_owned(),
        };
        let result = register_user(State(state), Json(duplicate)).await;

        assert!(matches!(result, Err(Error::DuplicateEmail)));
    }
}
