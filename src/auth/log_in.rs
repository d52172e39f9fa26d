//! Handlers for logging in and out with the session cookie.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::Duration;

use crate::{
    AppState, Error,
    auth::cookie::{invalidate_auth_cookie, set_auth_cookie},
    user::{User, UserID, UserRole, get_user_by_email},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials sent by the client to log in.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInData {
    pub email: String,
    pub password: String,
}

/// The subset of the user record that is safe to send to the client.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: UserID,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Handler for log-in requests via the POST method.
///
/// On success, the auth cookie is set and the session user is returned as JSON.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] when the email is unknown or the
/// password does not match. The two cases are indistinguishable to the client.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Json(credentials): Json<LogInData>,
) -> Result<(PrivateCookieJar, Json<SessionUser>), Error> {
    let user = {
        let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

        get_user_by_email(&credentials.email, &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    if !user.password_hash.verify(&credentials.password)? {
        return Err(Error::InvalidCredentials);
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((jar, Json(SessionUser::from(&user))))
}

/// Handler that invalidates the session cookie.
pub async fn post_log_out(
    State(_state): State<LoginState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<Value>) {
    (invalidate_auth_cookie(jar), Json(json!({ "success": true })))
}

#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use rusqlite::Connection;
    use sha2::{Digest, Sha512};
    use time::Duration;

    use crate::{
        Error,
        auth::{PasswordHash, cookie::get_token_from_cookies},
        user::{create_user, create_user_table},
    };

    use super::{LogInData, LoginState, post_log_in};

    /// The lowest cost bcrypt allows, used to keep the test fast.
    const TEST_COST: u32 = 4;

    fn get_login_state() -> LoginState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        LoginState {
            cookie_key: Key::from(&Sha512::digest("nafstenoas")),
            cookie_duration: Duration::minutes(30),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn insert_test_user(state: &LoginState) {
        let hash = PasswordHash::from_raw_password("okpassword", TEST_COST).unwrap();
        create_user(
            "foo@bar.baz",
            hash,
            &state.db_connection.lock().unwrap(),
        )
        .expect("Could not create test user");
    }

    fn get_jar(state: &LoginState) -> PrivateCookieJar {
        PrivateCookieJar::new(state.cookie_key.clone())
    }

    #[tokio::test]
    async fn log_in_with_valid_credentials_sets_cookie() {
        let state = get_login_state();
        insert_test_user(&state);
        let credentials = LogInData {
            email: "foo@bar.baz".to_owned(),
            password: "okpassword".to_owned(),
        };

        let (jar, Json(session_user)) =
            post_log_in(State(state.clone()), get_jar(&state), Json(credentials))
                .await
                .expect("Expected successful log in");

        assert_eq!(session_user.email, "foo@bar.baz");
        let token = get_token_from_cookies(&jar).expect("Expected valid token in jar");
        assert_eq!(token.user_id, session_user.id);
    }

    #[tokio::test]
    async fn log_in_with_wrong_password_fails() {
        let state = get_login_state();
        insert_test_user(&state);
        let credentials = LogInData {
            email: "foo@bar.baz".to_owned(),
            password: "wrongpassword".to_owned(),
        };

        let result = post_log_in(State(state.clone()), get_jar(&state), Json(credentials)).await;

        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn log_in_with_unknown_email_fails_identically() {
        let state = get_login_state();
        let credentials = LogInData {
            email: "nobody@bar.baz".to_owned(),
            password: "okpassword".to_owned(),
        };

        let result = post_log_in(State(state.clone()), get_jar(&state), Json(credentials)).await;

        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }
}
