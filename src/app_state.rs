//! Implements a struct that holds the state of the JSON API server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::{DEFAULT_COOKIE_DURATION, MailSender},
    db::initialize,
    feedback::ObjectStore,
    investment::QuoteProvider,
    pagination::PaginationConfig,
    rate_limit::RateLimiter,
};

/// The state of the JSON API server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The config that controls how list responses are paged.
    pub pagination_config: PaginationConfig,

    /// The per-IP counter guarding the feedback endpoint.
    pub rate_limiter: RateLimiter,

    /// Where feedback attachment images are stored.
    pub object_store: Arc<dyn ObjectStore>,

    /// Delivers password reset tokens.
    pub mail_sender: Arc<dyn MailSender>,

    /// Fetches the latest prices for investment symbols.
    pub quote_provider: Arc<dyn QuoteProvider>,

    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models and seeding the default categories.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        pagination_config: PaginationConfig,
        object_store: Arc<dyn ObjectStore>,
        mail_sender: Arc<dyn MailSender>,
        quote_provider: Arc<dyn QuoteProvider>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            pagination_config,
            rate_limiter: RateLimiter::default(),
            object_store,
            mail_sender,
            quote_provider,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
