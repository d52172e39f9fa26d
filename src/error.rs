//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::{StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A machine-readable description of a single invalid field in a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// The name of the offending field, e.g. "amount".
    pub field: String,
    /// A short machine-readable code, e.g. "positive" or "required".
    pub code: String,
    /// A human-readable explanation of the problem.
    pub detail: String,
}

impl FieldError {
    /// Create a field error from string slices.
    pub fn new(field: &str, code: &str, detail: &str) -> Self {
        Self {
            field: field.to_owned(),
            code: code.to_owned(),
            detail: detail.to_owned(),
        }
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid email and password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request carried no valid session cookie.
    #[error("authentication required")]
    Unauthenticated,

    /// The session is valid but the user does not own the resource, or the
    /// route requires the admin role.
    #[error("not authorized to access this resource")]
    Forbidden,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// One or more request fields failed validation.
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    /// The client exceeded the fixed-window rate limit.
    #[error("too many requests, retry in {retry_after_seconds} seconds")]
    RateLimited {
        /// Seconds until the current window resets.
        retry_after_seconds: u64,
    },

    /// The email address is already registered.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// A user category cannot be renamed or deleted while transactions reference it.
    #[error("the category is referenced by existing transactions")]
    CategoryInUse,

    /// Default categories are seeded by the system and cannot be modified.
    #[error("default categories cannot be modified")]
    ImmutableCategory,

    /// The password reset token does not exist, was already used, or expired.
    #[error("the password reset token is invalid or has expired")]
    InvalidResetToken,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JsonSerialization(String),

    /// A calendar date could not be constructed from its components.
    #[error("could not construct a valid date: {0}")]
    InvalidDate(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The quote provider could not be reached or returned garbage.
    #[error("quote provider error: {0}")]
    QuoteProvider(String),

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded attachment is not an accepted image type.
    #[error("unsupported attachment type \"{0}\", expected an image")]
    UnsupportedAttachmentType(String),

    /// The uploaded attachment exceeds the size ceiling.
    #[error("the attachment exceeds the maximum allowed size")]
    AttachmentTooLarge,

    /// The attachment bytes could not be written to the object store.
    #[error("could not store the attachment: {0}")]
    UploadFailed(String),
}

impl Error {
    /// Shorthand for a validation error with a single offending field.
    pub fn validation(field: &str, code: &str, detail: &str) -> Self {
        Error::Validation(vec![FieldError::new(field, code, detail)])
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Validation(_)
            | Error::DuplicateEmail
            | Error::CategoryInUse
            | Error::ImmutableCategory
            | Error::InvalidResetToken
            | Error::MultipartError(_) => StatusCode::BAD_REQUEST,
            Error::UnsupportedAttachmentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::AttachmentTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Error::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Error::HashingError(_)
            | Error::InvalidDate(_)
            | Error::JsonSerialization(_)
            | Error::DatabaseLock
            | Error::SqlError(_)
            | Error::QuoteProvider(_)
            | Error::UploadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal errors are logged server-side and replaced with an opaque
        // message so implementation details never reach the client.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
            return (
                status,
                Json(json!({ "message": "something went wrong, check the server logs" })),
            )
                .into_response();
        }

        match self {
            Error::Validation(errors) => (
                status,
                Json(json!({ "message": "validation failed", "errors": errors })),
            )
                .into_response(),
            Error::RateLimited {
                retry_after_seconds,
            } => (
                status,
                [(RETRY_AFTER, retry_after_seconds.to_string())],
                Json(json!({
                    "message": "too many requests",
                    "retry_after_seconds": retry_after_seconds,
                })),
            )
                .into_response(),
            error => (status, Json(json!({ "message": error.to_string() }))).into_response(),
        }
    }
}
