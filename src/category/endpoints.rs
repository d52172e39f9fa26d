//! Handlers for the category routes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        Category, CategoryData, CategoryId, CategoryName, create_category, delete_category,
        list_categories, update_category,
    },
    user::UserID,
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the default categories plus the user's own.
pub async fn list_categories_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    list_categories(user_id, &connection).map(Json)
}

/// Create a user category.
pub async fn create_category_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<CategoryData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = CategoryName::new(&data.name)?;
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    let category = create_category(user_id, name, &data, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a user category.
pub async fn update_category_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    Json(data): Json<CategoryData>,
) -> Result<Json<Category>, Error> {
    let name = CategoryName::new(&data.name)?;
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    update_category(category_id, user_id, name, &data, &connection).map(Json)
}

/// Delete a user category.
pub async fn delete_category_endpoint(
    State(state): State<CategoryEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    delete_category(category_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
