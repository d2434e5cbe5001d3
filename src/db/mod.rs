//! Database module: schema, models, and the source objects wrapping the
//! SQLite store.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: connection setup plus the `DataSource` and
//!   `CredentialsSource` access objects

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{AuthData, UserProfile};
pub use schema::SQLITE_INIT;
pub use sqlite::{CredentialsSource, DataSource, SqlitePool, connect, init_schema};
