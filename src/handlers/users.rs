use axum::Form;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::RosterError;
use crate::middleware::auth::RequireBasicAuth;
use crate::router::RosterState;
use crate::service::password::{generate_salt, hash_password};

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// GET /users -> all registered usernames, sorted; requires basic auth.
pub async fn list_users(
    RequireBasicAuth(user): RequireBasicAuth,
    State(state): State<RosterState>,
) -> Result<Json<Value>, RosterError> {
    let mut usernames = state.credentials.get_usernames().await?;
    usernames.sort();
    debug!(%user, "listing usernames");
    Ok(Json(json!({ "usernames": usernames })))
}

/// POST /users with form fields `username` and `password` -> 201 empty.
pub async fn register_user(
    State(state): State<RosterState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Result<StatusCode, RosterError> {
    let Ok(Form(form)) = form else {
        return Err(RosterError::MissingCredentials);
    };
    let (Some(username), Some(password)) = (form.username, form.password) else {
        return Err(RosterError::MissingCredentials);
    };

    let salt = generate_salt();
    let password_hash = hash_password(&password, &salt);
    state
        .credentials
        .set_credentials(&username, &password_hash, &salt)
        .await
        .map_err(|err| {
            warn!(%username, error = %err, "credential insert failed");
            err.into_write_failure("error registering user")
        })?;

    info!(%username, "registered new user");
    Ok(StatusCode::CREATED)
}
