//! Handlers for the goal and contribution routes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    goal::{
        ContributionData, ContributionId, FinancialGoal, GoalContribution, GoalData, GoalId,
        add_contribution, create_goal, delete_goal, get_goal, list_contributions, list_goals,
        remove_contribution, update_goal,
    },
    user::UserID,
};

/// The state needed for the goal endpoints.
#[derive(Debug, Clone)]
pub struct GoalEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the user's goals.
pub async fn list_goals_endpoint(
    State(state): State<GoalEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<FinancialGoal>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    list_goals(user_id, &connection).map(Json)
}

/// Create a goal.
pub async fn create_goal_endpoint(
    State(state): State<GoalEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<GoalData>,
) -> Result<(StatusCode, Json<FinancialGoal>), Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let goal = create_goal(user_id, &data, &connection)?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// Retrieve a single goal.
pub async fn get_goal_endpoint(
    State(state): State<GoalEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<Json<FinancialGoal>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    get_goal(goal_id, user_id, &connection).map(Json)
}

/// Update a goal.
pub async fn update_goal_endpoint(
    State(state): State<GoalEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
    Json(data): Json<GoalData>,
) -> Result<Json<FinancialGoal>, Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    update_goal(goal_id, user_id, &data, &connection).map(Json)
}

/// Delete a goal and its contributions.
pub async fn delete_goal_endpoint(
    State(state): State<GoalEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    delete_goal(goal_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// List a goal's contributions.
pub async fn list_contributions_endpoint(
    State(state): State<GoalEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
) -> Result<Json<Vec<GoalContribution>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    list_contributions(goal_id, user_id, &connection).map(Json)
}

/// The response for contribution writes: the contribution plus the goal with
/// its freshly recomputed aggregate.
#[derive(Debug, serde::Serialize)]
pub struct ContributionResponse {
    pub goal: FinancialGoal,
    pub contribution: GoalContribution,
}

/// Add a contribution to a goal.
pub async fn add_contribution_endpoint(
    State(state): State<GoalEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(goal_id): Path<GoalId>,
    Json(data): Json<ContributionData>,
) -> Result<(StatusCode, Json<ContributionResponse>), Error> {
    let mut connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    let (goal, contribution) = add_contribution(goal_id, user_id, &data, &mut connection)?;

    Ok((
        StatusCode::CREATED,
        Json(ContributionResponse { goal, contribution }),
    ))
}

/// Remove a contribution from a goal.
pub async fn remove_contribution_endpoint(
    State(state): State<GoalEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path((goal_id, contribution_id)): Path<(GoalId, ContributionId)>,
) -> Result<Json<FinancialGoal>, Error> {
    let mut connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    remove_contribution(goal_id, contribution_id, user_id, &mut connection).map(Json)
}

#[cfg(test)]
mod goal_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::Path, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        auth::PasswordHash,
        goal::{
            ContributionData, GoalData, create_goal_contribution_table, create_goal_table,
        },
        user::{UserID, create_user, create_user_table},
    };

    use super::{
        GoalEndpointState, add_contribution_endpoint, create_goal_endpoint,
        remove_contribution_endpoint,
    };

    fn get_state_and_user() -> (GoalEndpointState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        create_goal_table(&connection).unwrap();
        create_goal_contribution_table(&connection).unwrap();
        let user = create_user(
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (
            GoalEndpointState {
                db_connection: Arc::new(Mutex::new(connection)),
            },
            user.id,
        )
    }

    fn trip() -> GoalData {
        GoalData {
            name: "Trip".to_owned(),
            category: "Lazer".to_owned(),
            target_value: 1000.0,
            target_date: None,
        }
    }

    #[tokio::test]
    async fn add_contribution_returns_updated_goal() {
        let (state, user_id) = get_state_and_user();
        let (status, Json(goal)) =
            create_goal_endpoint(State(state.clone()), Extension(user_id), Json(trip()))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let (status, Json(response)) = add_contribution_endpoint(
            State(state),
            Extension(user_id),
            Path(goal.id),
            Json(ContributionData {
                amount: 600.0,
                date: None,
                notes: String::new(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.goal.current_value, 600.0);
        assert_eq!(response.contribution.amount, 600.0);
    }

    #[tokio::test]
    async fn remove_contribution_returns_recomputed_goal() {
        let (state, user_id) = get_state_and_user();
        let (_, Json(goal)) =
            create_goal_endpoint(State(state.clone()), Extension(user_id), Json(trip()))
                .await
                .unwrap();
        let (_, Json(response)) = add_contribution_endpoint(
            State(state.clone()),
            Extension(user_id),
            Path(goal.id),
            Json(ContributionData {
                amount: 250.0,
                date: None,
                notes: String::new(),
            }),
        )
        .await
        .unwrap();

        let Json(goal) = remove_contribution_endpoint(
            State(state),
            Extension(user_id),
            Path((goal.id, response.contribution.id)),
        )
        .await
        .unwrap();

        assert_eq!(goal.current_value, 0.0);
    }
}
