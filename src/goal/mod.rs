//! Financial goals and their contribution ledger.

mod db;
mod domain;
mod endpoints;
mod ledger;

pub use db::{
    create_goal, create_goal_contribution_table, create_goal_table, delete_goal, get_goal,
    list_contributions, list_goals, update_goal,
};
pub use domain::{
    ContributionData, ContributionId, FinancialGoal, GoalContribution, GoalData, GoalId,
};
pub use endpoints::{
    add_contribution_endpoint, create_goal_endpoint, delete_goal_endpoint, get_goal_endpoint,
    list_contributions_endpoint, list_goals_endpoint, remove_contribution_endpoint,
    update_goal_endpoint,
};
pub use ledger::{add_contribution, remove_contribution};
