//! Database operations for feedback tickets.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    feedback::{Feedback, FeedbackData, FeedbackId, FeedbackKind, FeedbackStatus},
    user::UserID,
};

/// Create the feedback table.
pub fn create_feedback_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS feedback (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                description TEXT NOT NULL,
                attachments TEXT NOT NULL DEFAULT '[]',
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Create a feedback ticket and return it with its generated ID.
pub fn create_feedback(
    user_id: UserID,
    data: &FeedbackData,
    connection: &Connection,
) -> Result<Feedback, Error> {
    let created_at = OffsetDateTime::now_utc();
    let attachments = serde_json::to_string(&data.attachments)
        .map_err(|error| Error::JsonSerialization(error.to_string()))?;

    connection.execute(
        "INSERT INTO feedback (user_id, kind, description, attachments, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            user_id.as_i64(),
            data.kind.as_str(),
            data.description.trim(),
            attachments,
            FeedbackStatus::Pending.as_str(),
            created_at,
        ),
    )?;

    Ok(Feedback {
        id: connection.last_insert_rowid(),
        user_id,
        kind: data.kind,
        description: data.description.trim().to_owned(),
        attachments: data.attachments.clone(),
        status: FeedbackStatus::Pending,
        created_at,
    })
}

/// Retrieve every ticket in the queue, newest first. Admin only; the caller
/// enforces the role check.
pub fn list_all_feedback(connection: &Connection) -> Result<Vec<Feedback>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, kind, description, attachments, status, created_at
             FROM feedback
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map([], map_feedback_row)?
        .map(|maybe_feedback| maybe_feedback.map_err(|error| error.into()))
        .collect()
}

/// Move a ticket to a new triage status. Admin only; the caller enforces the
/// role check.
pub fn update_feedback_status(
    feedback_id: FeedbackId,
    status: FeedbackStatus,
    connection: &Connection,
) -> Result<Feedback, Error> {
    let rows_affected = connection.execute(
        "UPDATE feedback SET status = ?1 WHERE id = ?2",
        (status.as_str(), feedback_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    connection
        .prepare(
            "SELECT id, user_id, kind, description, attachments, status, created_at
             FROM feedback WHERE id = :id",
        )?
        .query_row(&[(":id", &feedback_id)], map_feedback_row)
        .map_err(|error| error.into())
}

fn map_feedback_row(row: &Row) -> Result<Feedback, rusqlite::Error> {
    let kind: String = row.get(2)?;
    let raw_attachments: String = row.get(4)?;
    let status: String = row.get(5)?;

    // A row we wrote always holds a valid JSON array; fall back to empty
    // rather than failing the whole listing.
    let attachments = serde_json::from_str(&raw_attachments).unwrap_or_default();

    Ok(Feedback {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        kind: FeedbackKind::from_str(&kind),
        description: row.get(3)?,
        attachments,
        status: FeedbackStatus::from_str(&status),
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod feedback_db_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::PasswordHash,
        user::{UserID, create_user, create_user_table},
    };

    use super::{
        FeedbackData, FeedbackKind, FeedbackStatus, create_feedback, create_feedback_table,
        list_all_feedback, update_feedback_status,
    };

    fn get_connection_and_user() -> (Connection, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        create_feedback_table(&connection).unwrap();
        let user = create_user(
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (connection, user.id)
    }

    fn bug_report() -> FeedbackData {
        FeedbackData {
            kind: FeedbackKind::Bug,
            description: "The launch button does nothing".to_owned(),
            attachments: vec!["/uploads/1/screenshot.png".to_owned()],
        }
    }

    #[test]
    fn create_round_trips_attachments() {
        let (connection, user_id) = get_connection_and_user();

        let created = create_feedback(user_id, &bug_report(), &connection).unwrap();
        let listed = list_all_feedback(&connection).unwrap();

        assert_eq!(listed, vec![created.clone()]);
        assert_eq!(created.attachments, bug_report().attachments);
        assert_eq!(created.status, FeedbackStatus::Pending);
    }

    #[test]
    fn update_status_moves_ticket() {
        let (connection, user_id) = get_connection_and_user();
        let ticket = create_feedback(user_id, &bug_report(), &connection).unwrap();

        let updated =
            update_feedback_status(ticket.id, FeedbackStatus::Resolved, &connection).unwrap();

        assert_eq!(updated.status, FeedbackStatus::Resolved);
    }

    #[test]
    fn update_status_of_missing_ticket_is_not_found() {
        let (connection, _) = get_connection_and_user();

        let result = update_feedback_status(999, FeedbackStatus::Resolved, &connection);

        assert_eq!(result, Err(Error::NotFound));
    }
}
