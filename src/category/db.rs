//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryData, CategoryId, CategoryName},
    transaction::TransactionKind,
    user::UserID,
};

/// The default category used for the expense created when an invoice is paid.
pub const CARD_INVOICE_CATEGORY: &str = "Fatura Cartão";

/// The default category that marks a goal as the user's emergency fund.
pub const EMERGENCY_FUND_CATEGORY: &str = "Reserva de Emergência";

/// Create the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            icon TEXT NOT NULL DEFAULT '',
            color TEXT NOT NULL DEFAULT '',
            is_default INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

/// Insert the system default categories if they have not been seeded yet.
pub fn seed_default_categories(connection: &Connection) -> Result<(), Error> {
    let default_count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM category WHERE is_default = 1",
        [],
        |row| row.get(0),
    )?;

    if default_count > 0 {
        return Ok(());
    }

    let defaults: &[(&str, TransactionKind, &str, &str)] = &[
        ("Alimentação", TransactionKind::Expense, "utensils", "#e74c3c"),
        ("Transporte", TransactionKind::Expense, "bus", "#3498db"),
        ("Moradia", TransactionKind::Expense, "home", "#9b59b6"),
        ("Saúde", TransactionKind::Expense, "heart-pulse", "#e67e22"),
        ("Educação", TransactionKind::Expense, "book", "#1abc9c"),
        ("Lazer", TransactionKind::Expense, "gamepad", "#f1c40f"),
        ("Compras", TransactionKind::Expense, "shopping-bag", "#fd79a8"),
        (CARD_INVOICE_CATEGORY, TransactionKind::Expense, "credit-card", "#636e72"),
        ("Salário", TransactionKind::Income, "banknote", "#2ecc71"),
        ("Investimentos", TransactionKind::Income, "trending-up", "#27ae60"),
        (EMERGENCY_FUND_CATEGORY, TransactionKind::Expense, "shield", "#0984e3"),
        ("Outros", TransactionKind::Expense, "ellipsis", "#95a5a6"),
    ];

    let mut statement = connection.prepare(
        "INSERT INTO category (user_id, name, kind, icon, color, is_default)
         VALUES (NULL, ?1, ?2, ?3, ?4, 1)",
    )?;

    for (name, kind, icon, color) in defaults {
        statement.execute((name, kind.as_str(), icon, color))?;
    }

    Ok(())
}

/// Create a user category and return it with its generated ID.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    data: &CategoryData,
    connection: &Connection,
) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (user_id, name, kind, icon, color, is_default)
         VALUES (?1, ?2, ?3, ?4, ?5, 0)",
        (
            user_id.as_i64(),
            name.as_ref(),
            data.kind.as_str(),
            &data.icon,
            &data.color,
        ),
    )?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        user_id: Some(user_id),
        name,
        kind: data.kind,
        icon: data.icon.clone(),
        color: data.color.clone(),
        is_default: false,
    })
}

/// Retrieve a single category visible to `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] for a missing row and [Error::Forbidden] when the
/// category belongs to another user.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "SELECT id, user_id, name, kind, icon, color, is_default
             FROM category WHERE id = :id",
        )?
        .query_row(&[(":id", &category_id)], map_row)?;

    match category.user_id {
        Some(owner) if owner != user_id => Err(Error::Forbidden),
        _ => Ok(category),
    }
}

/// Retrieve the system defaults plus the user's own categories.
pub fn list_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, kind, icon, color, is_default
             FROM category
             WHERE is_default = 1 OR user_id = :user_id
             ORDER BY is_default DESC, name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Whether any of the user's transactions reference the category by name.
pub fn category_is_referenced(
    name: &CategoryName,
    user_id: UserID,
    connection: &Connection,
) -> Result<bool, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM \"transaction\" WHERE category = :name AND user_id = :user_id",
        rusqlite::named_params! {
            ":name": name.as_ref(),
            ":user_id": user_id.as_i64(),
        },
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// Update a user category's fields.
///
/// # Errors
/// - [Error::ImmutableCategory] for system defaults.
/// - [Error::CategoryInUse] when any transaction references the category,
///   whichever field the edit touches.
pub fn update_category(
    category_id: CategoryId,
    user_id: UserID,
    name: CategoryName,
    data: &CategoryData,
    connection: &Connection,
) -> Result<Category, Error> {
    let existing = get_category(category_id, user_id, connection)?;

    if existing.is_default {
        return Err(Error::ImmutableCategory);
    }

    if category_is_referenced(&existing.name, user_id, connection)? {
        return Err(Error::CategoryInUse);
    }

    connection.execute(
        "UPDATE category SET name = ?1, kind = ?2, icon = ?3, color = ?4 WHERE id = ?5",
        (
            name.as_ref(),
            data.kind.as_str(),
            &data.icon,
            &data.color,
            category_id,
        ),
    )?;

    Ok(Category {
        id: category_id,
        user_id: Some(user_id),
        name,
        kind: data.kind,
        icon: data.icon.clone(),
        color: data.color.clone(),
        is_default: false,
    })
}

/// Delete a user category.
///
/// # Errors
/// - [Error::ImmutableCategory] for system defaults.
/// - [Error::CategoryInUse] when transactions still reference it.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let existing = get_category(category_id, user_id, connection)?;

    if existing.is_default {
        return Err(Error::ImmutableCategory);
    }

    if category_is_referenced(&existing.name, user_id, connection)? {
        return Err(Error::CategoryInUse);
    }

    connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_user_id: Option<i64> = row.get(1)?;
    let raw_name: String = row.get(2)?;
    let raw_kind: String = row.get(3)?;

    Ok(Category {
        id: row.get(0)?,
        user_id: raw_user_id.map(UserID::new),
        name: CategoryName::new_unchecked(&raw_name),
        kind: TransactionKind::from_str(&raw_kind),
        icon: row.get(4)?,
        color: row.get(5)?,
        is_default: row.get(6)?,
    })
}
