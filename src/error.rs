use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RosterError {
    /// Request body is missing a non-empty object under the `data` key.
    #[error("bad/no data in request")]
    BadPayload,

    /// No row matched the requested id on a read.
    #[error("data not found")]
    NotFound,

    /// Registration form lacks a `username` or `password` field.
    #[error("missing username or password in registration form")]
    MissingCredentials,

    /// Basic-auth header absent, username unknown, or password mismatch.
    #[error("invalid username or password")]
    Unauthorized,

    /// The store rejected a statement (constraint violation, I/O, decode).
    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    /// A write landed on an unexpected number of rows. An id with no row
    /// behind it surfaces here as `affected: 0`, indistinguishable from any
    /// other write failure.
    #[error("write affected {affected} rows, expected exactly one")]
    RowCount { affected: u64 },

    /// Store failure already folded into the fixed body an operation's HTTP
    /// contract prescribes (`data not created`, `data not updated`, ...).
    #[error("{message}")]
    WriteFailed { message: &'static str },

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl RosterError {
    /// Collapse a store-layer failure into the operation-specific message the
    /// HTTP surface fixes; anything else passes through untouched.
    pub fn into_write_failure(self, message: &'static str) -> Self {
        match self {
            RosterError::Database(_) | RosterError::RowCount { .. } => {
                RosterError::WriteFailed { message }
            }
            other => other,
        }
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RosterError::BadPayload => (StatusCode::BAD_REQUEST, self.to_string()),
            RosterError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            RosterError::MissingCredentials => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            RosterError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            RosterError::WriteFailed { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, (*message).to_string())
            }
            // Raw store errors reaching the surface get an opaque body.
            RosterError::Database(_) | RosterError::RowCount { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal database error".to_string(),
            ),
            RosterError::Reqwest(_) => (
                StatusCode::BAD_GATEWAY,
                "upstream service unavailable".to_string(),
            ),
        };

        let body = Json(json!({ "error": message }));
        if matches!(self, RosterError::Unauthorized) {
            (
                status,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"roster\"")],
                body,
            )
                .into_response()
        } else {
            (status, body).into_response()
        }
    }
}
