//! Caderneta is a web app for managing your personal finances: transactions,
//! budgets by category, credit cards and their invoices, financial goals,
//! recurring expenses and investments.
//!
//! This library provides the JSON REST API behind the app.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod card;
mod category;
mod db;
mod endpoints;
mod error;
mod feedback;
mod goal;
mod investment;
mod invoice;
mod pagination;
mod purchase;
mod rate_limit;
mod recurring;
mod report;
mod routing;
mod template;
mod transaction;
mod user;

pub use app_state::{AppState, create_cookie_key};
pub use auth::{LogMailSender, MailSender, PasswordHash, ValidatedPassword};
pub use db::initialize as initialize_db;
pub use error::{Error, FieldError};
pub use feedback::{LocalObjectStore, ObjectStore};
pub use investment::{QuoteProvider, YahooQuoteProvider};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use user::{User, UserID, get_user_by_id};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
