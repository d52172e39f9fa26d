//! The contribution ledger: every write recomputes the goal's aggregate
//! inside the same SQL transaction, so `current_value` can never drift from
//! the sum of its contributions.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    goal::{
        ContributionData, ContributionId, FinancialGoal, GoalContribution, GoalId,
        db::map_contribution_row, get_goal,
    },
    user::UserID,
};

/// Add a contribution to a goal.
///
/// The goal's `current_value` is recomputed from all contribution rows and
/// `completed` is re-derived. `completed_at` is stamped only on the
/// incomplete-to-complete transition.
pub fn add_contribution(
    goal_id: GoalId,
    user_id: UserID,
    data: &ContributionData,
    connection: &mut Connection,
) -> Result<(FinancialGoal, GoalContribution), Error> {
    data.validate()?;

    let sql_transaction = connection.transaction()?;

    let goal = get_goal(goal_id, user_id, &sql_transaction)?;
    let date = data
        .date
        .unwrap_or_else(|| OffsetDateTime::now_utc().date());

    sql_transaction.execute(
        "INSERT INTO goal_contribution (goal_id, amount, date, notes) VALUES (?1, ?2, ?3, ?4)",
        (goal_id, data.amount, date, &data.notes),
    )?;
    let contribution = GoalContribution {
        id: sql_transaction.last_insert_rowid(),
        goal_id,
        amount: data.amount,
        date,
        notes: data.notes.clone(),
    };

    let goal = recompute_aggregate(goal, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok((goal, contribution))
}

/// Remove a contribution from a goal.
///
/// `current_value` and `completed` are recomputed the same way as on add;
/// `completed_at` is deliberately left in place as a record of when the goal
/// was first reached.
pub fn remove_contribution(
    goal_id: GoalId,
    contribution_id: ContributionId,
    user_id: UserID,
    connection: &mut Connection,
) -> Result<FinancialGoal, Error> {
    let sql_transaction = connection.transaction()?;

    let goal = get_goal(goal_id, user_id, &sql_transaction)?;

    // Membership check before deleting: the contribution must belong to this goal.
    sql_transaction
        .prepare("SELECT id, goal_id, amount, date, notes FROM goal_contribution WHERE id = :id AND goal_id = :goal_id")?
        .query_row(
            rusqlite::named_params! {":id": contribution_id, ":goal_id": goal_id},
            map_contribution_row,
        )?;

    sql_transaction.execute(
        "DELETE FROM goal_contribution WHERE id = ?1",
        [contribution_id],
    )?;

    let goal = recompute_aggregate(goal, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(goal)
}

fn recompute_aggregate(
    goal: FinancialGoal,
    connection: &Connection,
) -> Result<FinancialGoal, Error> {
    let sum: f64 = connection.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM goal_contribution WHERE goal_id = :goal_id",
        &[(":goal_id", &goal.id)],
        |row| row.get(0),
    )?;
    let current_value = ((sum.max(0.0)) * 100.0).round() / 100.0;

    let completed = current_value >= goal.target_value;
    let completed_at = match (goal.completed_at, completed && !goal.completed) {
        (None, true) => Some(OffsetDateTime::now_utc()),
        (stamped, _) => stamped,
    };

    connection.execute(
        "UPDATE goal SET current_value = ?1, completed = ?2, completed_at = ?3 WHERE id = ?4",
        (current_value, completed, completed_at, goal.id),
    )?;

    Ok(FinancialGoal {
        current_value,
        completed,
        completed_at,
        ..goal
    })
}
