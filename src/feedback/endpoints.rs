//! Handlers for the feedback routes.
//!
//! Ticket creation is rate limited per client IP; listing and triage are
//! admin-only.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Extension, Json,
    extract::{ConnectInfo, FromRef, Multipart, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    AppState, Error,
    feedback::{
        Feedback, FeedbackData, FeedbackId, FeedbackStatus, ObjectStore, create_feedback,
        list_all_feedback, update_feedback_status,
    },
    rate_limit::RateLimiter,
    user::{UserID, UserRole, get_user_by_id},
};

/// The ceiling on attachment size.
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// The state needed for the feedback endpoints.
#[derive(Clone)]
pub struct FeedbackEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub rate_limiter: RateLimiter,
    pub object_store: Arc<dyn ObjectStore>,
}

impl FromRef<AppState> for FeedbackEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            rate_limiter: state.rate_limiter.clone(),
            object_store: state.object_store.clone(),
        }
    }
}

/// Create a feedback ticket.
pub async fn create_feedback_endpoint(
    State(state): State<FeedbackEndpointState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<FeedbackData>,
) -> Result<(StatusCode, Json<Feedback>), Error> {
    state
        .rate_limiter
        .check(addr.ip(), OffsetDateTime::now_utc())?;
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let feedback = create_feedback(user_id, &data, &connection)?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

/// The response body for a successful attachment upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// The public URL to reference in a subsequent ticket.
    pub url: String,
}

/// Upload an image attachment for a future ticket.
pub async fn upload_attachment_endpoint(
    State(state): State<FeedbackEndpointState>,
    Extension(user_id): Extension<UserID>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let extension = attachment_extension(&content_type)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|error| Error::MultipartError(error.to_string()))?;
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(Error::AttachmentTooLarge);
        }

        let key = format!("{}/{}.{}", user_id, Uuid::new_v4().simple(), extension);
        let url = state.object_store.put(&key, &bytes)?;

        return Ok((StatusCode::CREATED, Json(UploadResponse { url })));
    }

    Err(Error::MultipartError(
        "the form contained no file field".to_owned(),
    ))
}

/// List every ticket in the queue. Admin only.
pub async fn list_feedback_endpoint(
    State(state): State<FeedbackEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Feedback>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    require_admin(user_id, &connection)?;

    list_all_feedback(&connection).map(Json)
}

/// The request body for moving a ticket through triage.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusRequest {
    pub status: FeedbackStatus,
}

/// Move a ticket to a new triage status. Admin only.
pub async fn update_feedback_status_endpoint(
    State(state): State<FeedbackEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(feedback_id): Path<FeedbackId>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Feedback>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    require_admin(user_id, &connection)?;

    update_feedback_status(feedback_id, request.status, &connection).map(Json)
}

fn require_admin(user_id: UserID, connection: &Connection) -> Result<(), Error> {
    if get_user_by_id(user_id, connection)?.role != UserRole::Admin {
        return Err(Error::Forbidden);
    }

    Ok(())
}

fn attachment_extension(content_type: &str) -> Result<&'static str, Error> {
    match content_type {
        "image/png" => Ok("png"),
        "image/jpeg" => Ok("jpg"),
        "image/gif" => Ok("gif"),
        "image/webp" => Ok("webp"),
        other => Err(Error::UnsupportedAttachmentType(other.to_owned())),
    }
}

#[cfg(test)]
mod feedback_endpoint_tests {
    use std::{
        net::{IpAddr, Ipv4Addr, SocketAddr},
        sync::{Arc, Mutex},
    };

    use axum::{
        Extension, Json,
        extract::{ConnectInfo, Path, State},
    };
    use rusqlite::Connection;

    use crate::{
        Error, LocalObjectStore,
        auth::PasswordHash,
        feedback::{FeedbackData, FeedbackKind, FeedbackStatus, create_feedback_table},
        rate_limit::RateLimiter,
        user::{UserID, create_user, create_user_table, promote_to_admin},
    };

    use super::{
        FeedbackEndpointState, StatusRequest, attachment_extension, create_feedback_endpoint,
        list_feedback_endpoint, update_feedback_status_endpoint,
    };

    fn get_state_and_user() -> (FeedbackEndpointState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        create_feedback_table(&connection).unwrap();
        let user = create_user(
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let upload_dir = tempfile::tempdir().unwrap();

        (
            FeedbackEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
                rate_limiter: RateLimiter::default(),
                object_store: Arc::new(LocalObjectStore::new(upload_dir.keep(), "/uploads")),
            },
            user.id,
        )
    }

    fn bug_report() -> FeedbackData {
        FeedbackData {
            kind: FeedbackKind::Bug,
            description: "The launch button does nothing".to_owned(),
            attachments: Vec::new(),
        }
    }

    fn local_addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 54321)
    }

    #[tokio::test]
    async fn sixth_ticket_within_the_hour_is_rate_limited() {
        let (state, user_id) = get_state_and_user();

        for _ in 0..5 {
            create_feedback_endpoint(
                State(state.clone()),
                ConnectInfo(local_addr()),
                Extension(user_id),
                Json(bug_report()),
            )
            .await
            .unwrap();
        }

        let result = create_feedback_endpoint(
            State(state),
            ConnectInfo(local_addr()),
            Extension(user_id),
            Json(bug_report()),
        )
        .await;

        assert!(matches!(result, Err(Error::RateLimited { .. })));
    }

    #[tokio::test]
    async fn listing_requires_the_admin_role() {
        let (state, user_id) = get_state_and_user();

        let result = list_feedback_endpoint(State(state), Extension(user_id)).await;

        assert!(matches!(result, Err(Error::Forbidden)));
    }

    #[tokio::test]
    async fn admin_can_move_ticket_through_triage() {
        let (state, user_id) = get_state_and_user();
        let (_, Json(ticket)) = create_feedback_endpoint(
            State(state.clone()),
            ConnectInfo(local_addr()),
            Extension(user_id),
            Json(bug_report()),
        )
        .await
        .unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            promote_to_admin(user_id, &connection);
        }

        let Json(updated) = update_feedback_status_endpoint(
            State(state),
            Extension(user_id),
            Path(ticket.id),
            Json(StatusRequest {
                status: FeedbackStatus::InProgress,
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.status, FeedbackStatus::InProgress);
    }

    #[test]
    fn only_image_content_types_are_accepted() {
        assert_eq!(attachment_extension("image/png"), Ok("png"));
        assert_eq!(attachment_extension("image/webp"), Ok("webp"));
        assert!(matches!(
            attachment_extension("application/pdf"),
            Err(Error::UnsupportedAttachmentType(_))
        ));
    }
}
