use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::error::RosterError;
use crate::router::RosterState;

/// HEAD / -> 204, liveness check.
pub async fn liveness() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// GET /data -> ids of every stored record.
pub async fn list_ids(State(state): State<RosterState>) -> Result<Json<Value>, RosterError> {
    let ids = state.data.get_ids().await?;
    Ok(Json(json!({ "ids": ids })))
}

/// GET /data/{id} -> one record, 404 when no row matches.
pub async fn read_data(
    State(state): State<RosterState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, RosterError> {
    match state.data.get_data(id).await? {
        Some(record) => Ok(Json(json!({ "data": record }))),
        None => Err(RosterError::NotFound),
    }
}

/// POST /data with `{"data": {...}}` -> 201 `{"id": N}`.
pub async fn create_data(
    State(state): State<RosterState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), RosterError> {
    let data = extract_data(body)?;
    let Some((name, username, email)) = record_fields(&data) else {
        return Err(RosterError::WriteFailed {
            message: "data not created",
        });
    };

    let id = state
        .data
        .add_data(&name, &username, &email)
        .await
        .map_err(|err| {
            warn!(error = %err, "insert into user_data failed");
            err.into_write_failure("data not created")
        })?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// PUT /data/{id} with `{"data": {...}}` -> 204 empty.
pub async fn update_data(
    State(state): State<RosterState>,
    Path(id): Path<i64>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, RosterError> {
    let data = extract_data(body)?;
    let Some((name, username, email)) = record_fields(&data) else {
        return Err(RosterError::WriteFailed {
            message: "data not updated",
        });
    };

    state
        .data
        .update_data(id, &name, &username, &email)
        .await
        .map_err(|err| {
            warn!(id, error = %err, "update of user_data row failed");
            err.into_write_failure("data not updated")
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /data/{id} -> 204 empty.
pub async fn delete_data(
    State(state): State<RosterState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, RosterError> {
    state.data.delete_data(id).await.map_err(|err| {
        warn!(id, error = %err, "delete of user_data row failed");
        err.into_write_failure("data not deleted")
    })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Pull the non-empty object stored under the `data` key. Unparseable
/// bodies, a missing key, and an empty or non-object value are all the same
/// client error.
fn extract_data(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, RosterError> {
    let Ok(Json(value)) = body else {
        return Err(RosterError::BadPayload);
    };
    match value.get("data") {
        Some(Value::Object(map)) if !map.is_empty() => Ok(map.clone()),
        _ => Err(RosterError::BadPayload),
    }
}

/// The three columns every write needs. A payload lacking one never reaches
/// the store and reports the same failure the store would.
fn record_fields(data: &Map<String, Value>) -> Option<(String, String, String)> {
    let field = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_owned);
    Some((field("name")?, field("username")?, field("email")?))
}
