//! Database operations for goals and their contributions.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    goal::{FinancialGoal, GoalContribution, GoalData, GoalId},
    user::UserID,
};

/// Create the goal table.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                target_value REAL NOT NULL,
                current_value REAL NOT NULL DEFAULT 0,
                target_date TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                completed_at TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Create the goal contribution table.
pub fn create_goal_contribution_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal_contribution (
                id INTEGER PRIMARY KEY,
                goal_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                FOREIGN KEY(goal_id) REFERENCES goal(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Create a goal and return it with its generated ID.
pub fn create_goal(
    user_id: UserID,
    data: &GoalData,
    connection: &Connection,
) -> Result<FinancialGoal, Error> {
    connection.execute(
        "INSERT INTO goal (user_id, name, category, target_value, target_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            user_id.as_i64(),
            data.name.trim(),
            data.category.trim(),
            data.target_value,
            data.target_date,
        ),
    )?;

    Ok(FinancialGoal {
        id: connection.last_insert_rowid(),
        user_id,
        name: data.name.trim().to_owned(),
        category: data.category.trim().to_owned(),
        target_value: data.target_value,
        current_value: 0.0,
        target_date: data.target_date,
        completed: false,
        completed_at: None,
    })
}

/// Retrieve a single goal owned by `user_id`.
pub fn get_goal(
    goal_id: GoalId,
    user_id: UserID,
    connection: &Connection,
) -> Result<FinancialGoal, Error> {
    let goal = connection
        .prepare(
            "SELECT id, user_id, name, category, target_value, current_value, target_date,
                    completed, completed_at
             FROM goal WHERE id = :id",
        )?
        .query_row(&[(":id", &goal_id)], map_goal_row)?;

    if goal.user_id != user_id {
        return Err(Error::Forbidden);
    }

    Ok(goal)
}

/// Retrieve all of the user's goals, incomplete first.
pub fn list_goals(user_id: UserID, connection: &Connection) -> Result<Vec<FinancialGoal>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, category, target_value, current_value, target_date,
                    completed, completed_at
             FROM goal
             WHERE user_id = :user_id
             ORDER BY completed ASC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Update a goal's fields, re-deriving completion against the new target.
///
/// Lowering the target below the current value marks the goal complete and
/// stamps `completed_at` if it was not complete before.
pub fn update_goal(
    goal_id: GoalId,
    user_id: UserID,
    data: &GoalData,
    connection: &Connection,
) -> Result<FinancialGoal, Error> {
    let existing = get_goal(goal_id, user_id, connection)?;

    let completed = existing.current_value >= data.target_value;
    let completed_at = match (existing.completed_at, completed && !existing.completed) {
        (None, true) => Some(OffsetDateTime::now_utc()),
        (stamped, _) => stamped,
    };

    connection.execute(
        "UPDATE goal
         SET name = ?1, category = ?2, target_value = ?3, target_date = ?4,
             completed = ?5, completed_at = ?6
         WHERE id = ?7",
        (
            data.name.trim(),
            data.category.trim(),
            data.target_value,
            data.target_date,
            completed,
            completed_at,
            goal_id,
        ),
    )?;

    Ok(FinancialGoal {
        name: data.name.trim().to_owned(),
        category: data.category.trim().to_owned(),
        target_value: data.target_value,
        target_date: data.target_date,
        completed,
        completed_at,
        ..existing
    })
}

/// Delete a goal and its contributions.
pub fn delete_goal(goal_id: GoalId, user_id: UserID, connection: &Connection) -> Result<(), Error> {
    get_goal(goal_id, user_id, connection)?;

    connection.execute(
        "DELETE FROM goal_contribution WHERE goal_id = ?1",
        [goal_id],
    )?;
    connection.execute("DELETE FROM goal WHERE id = ?1", [goal_id])?;

    Ok(())
}

/// Retrieve a goal's contributions, newest first.
pub fn list_contributions(
    goal_id: GoalId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<GoalContribution>, Error> {
    get_goal(goal_id, user_id, connection)?;

    connection
        .prepare(
            "SELECT id, goal_id, amount, date, notes
             FROM goal_contribution
             WHERE goal_id = :goal_id
             ORDER BY date DESC, id DESC",
        )?
        .query_map(&[(":goal_id", &goal_id)], map_contribution_row)?
        .map(|maybe_contribution| maybe_contribution.map_err(|error| error.into()))
        .collect()
}

fn map_goal_row(row: &Row) -> Result<FinancialGoal, rusqlite::Error> {
    Ok(FinancialGoal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        category: row.get(3)?,
        target_value: row.get(4)?,
        current_value: row.get(5)?,
        target_date: row.get(6)?,
        completed: row.get(7)?,
        completed_at: row.get(8)?,
    })
}

pub(crate) fn map_contribution_row(row: &Row) -> Result<GoalContribution, rusqlite::Error> {
    Ok(GoalContribution {
        id: row.get(0)?,
        goal_id: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        notes: row.get(4)?,
    })
}
