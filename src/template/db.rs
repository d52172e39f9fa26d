//! Database operations for transaction templates.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    template::{TemplateData, TemplateId, TransactionTemplate},
    transaction::TransactionKind,
    user::UserID,
};

/// Create the transaction template table.
pub fn create_template_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaction_template (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                kind TEXT NOT NULL DEFAULT 'expense',
                amount REAL,
                usage_count INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Create a template and return it with its generated ID.
pub fn create_template(
    user_id: UserID,
    data: &TemplateData,
    connection: &Connection,
) -> Result<TransactionTemplate, Error> {
    let updated_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO transaction_template (user_id, name, category, kind, amount, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            user_id.as_i64(),
            data.name.trim(),
            data.category.trim(),
            data.kind.as_str(),
            data.amount,
            updated_at,
        ),
    )?;

    Ok(TransactionTemplate {
        id: connection.last_insert_rowid(),
        user_id,
        name: data.name.trim().to_owned(),
        category: data.category.trim().to_owned(),
        kind: data.kind,
        amount: data.amount,
        usage_count: 0,
        updated_at,
    })
}

/// Retrieve a single template owned by `user_id`.
pub fn get_template(
    template_id: TemplateId,
    user_id: UserID,
    connection: &Connection,
) -> Result<TransactionTemplate, Error> {
    let template = connection
        .prepare(
            "SELECT id, user_id, name, category, kind, amount, usage_count, updated_at
             FROM transaction_template WHERE id = :id",
        )?
        .query_row(&[(":id", &template_id)], map_template_row)?;

    if template.user_id != user_id {
        return Err(Error::Forbidden);
    }

    Ok(template)
}

/// Retrieve all of the user's templates, most used first.
pub fn list_templates(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<TransactionTemplate>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, category, kind, amount, usage_count, updated_at
             FROM transaction_template
             WHERE user_id = :user_id
             ORDER BY usage_count DESC, name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_template_row)?
        .map(|maybe_template| maybe_template.map_err(|error| error.into()))
        .collect()
}

/// Update a template's fields, leaving its usage count untouched.
pub fn update_template(
    template_id: TemplateId,
    user_id: UserID,
    data: &TemplateData,
    connection: &Connection,
) -> Result<TransactionTemplate, Error> {
    let existing = get_template(template_id, user_id, connection)?;
    let updated_at = OffsetDateTime::now_utc();

    connection.execute(
        "UPDATE transaction_template
         SET name = ?1, category = ?2, kind = ?3, amount = ?4, updated_at = ?5
         WHERE id = ?6",
        (
            data.name.trim(),
            data.category.trim(),
            data.kind.as_str(),
            data.amount,
            updated_at,
            template_id,
        ),
    )?;

    Ok(TransactionTemplate {
        name: data.name.trim().to_owned(),
        category: data.category.trim().to_owned(),
        kind: data.kind,
        amount: data.amount,
        updated_at,
        ..existing
    })
}

/// Delete a template.
pub fn delete_template(
    template_id: TemplateId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    get_template(template_id, user_id, connection)?;

    connection.execute(
        "DELETE FROM transaction_template WHERE id = ?1",
        [template_id],
    )?;

    Ok(())
}

/// Record a use of the template: bump its usage count and stamp `updated_at`.
pub fn use_template(
    template_id: TemplateId,
    user_id: UserID,
    connection: &Connection,
) -> Result<TransactionTemplate, Error> {
    let existing = get_template(template_id, user_id, connection)?;
    let updated_at = OffsetDateTime::now_utc();

    connection.execute(
        "UPDATE transaction_template SET usage_count = usage_count + 1, updated_at = ?1
         WHERE id = ?2",
        (updated_at, template_id),
    )?;

    Ok(TransactionTemplate {
        usage_count: existing.usage_count + 1,
        updated_at,
        ..existing
    })
}

fn map_template_row(row: &Row) -> Result<TransactionTemplate, rusqlite::Error> {
    let kind: String = row.get(4)?;

    Ok(TransactionTemplate {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        category: row.get(3)?,
        kind: TransactionKind::from_str(&kind),
        amount: row.get(5)?,
        usage_count: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
