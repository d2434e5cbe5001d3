use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `user_data` row as handed to API clients. The id column stays out of
/// the record; callers that need it already have it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub name: String,
    pub username: String,
    pub email: String,
}

/// Hash and salt stored for one username in `user_credentials`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AuthData {
    pub password_hash: String,
    pub password_salt: String,
}
