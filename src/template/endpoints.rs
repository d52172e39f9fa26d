//! Handlers for the transaction template routes.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    template::{
        TemplateData, TemplateId, TransactionTemplate, create_template, delete_template,
        list_templates, update_template, use_template,
    },
    user::UserID,
};

/// The state needed for the template endpoints.
#[derive(Debug, Clone)]
pub struct TemplateEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TemplateEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the user's templates, most used first.
pub async fn list_templates_endpoint(
    State(state): State<TemplateEndpointState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<TransactionTemplate>>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    list_templates(user_id, &connection).map(Json)
}

/// Create a template.
pub async fn create_template_endpoint(
    State(state): State<TemplateEndpointState>,
    Extension(user_id): Extension<UserID>,
    Json(data): Json<TemplateData>,
) -> Result<(StatusCode, Json<TransactionTemplate>), Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;
    let template = create_template(user_id, &data, &connection)?;

    Ok((StatusCode::CREATED, Json(template)))
}

/// Update a template.
pub async fn update_template_endpoint(
    State(state): State<TemplateEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(template_id): Path<TemplateId>,
    Json(data): Json<TemplateData>,
) -> Result<Json<TransactionTemplate>, Error> {
    data.validate()?;

    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    update_template(template_id, user_id, &data, &connection).map(Json)
}

/// Delete a template.
pub async fn delete_template_endpoint(
    State(state): State<TemplateEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(template_id): Path<TemplateId>,
) -> Result<StatusCode, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    delete_template(template_id, user_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Record a use of the template and return it with the bumped count.
pub async fn use_template_endpoint(
    State(state): State<TemplateEndpointState>,
    Extension(user_id): Extension<UserID>,
    Path(template_id): Path<TemplateId>,
) -> Result<Json<TransactionTemplate>, Error> {
    let connection = state.db_connection.lock().map_err(|_| Error::DatabaseLock)?;

    use_template(template_id, user_id, &connection).map(Json)
}
