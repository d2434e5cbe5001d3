use axum::Router;
use axum::routing::{get, head};
use tower_http::trace::TraceLayer;

use crate::db::{CredentialsSource, DataSource};
use crate::handlers::{data, users};

/// Shared state handed to every handler: the two source objects over the one
/// backing store.
#[derive(Clone)]
pub struct RosterState {
    pub data: DataSource,
    pub credentials: CredentialsSource,
}

impl RosterState {
    pub fn new(data: DataSource, credentials: CredentialsSource) -> Self {
        Self { data, credentials }
    }
}

/// Build the full route table.
pub fn roster_router(state: RosterState) -> Router {
    Router::new()
        .route("/", head(data::liveness))
        .route("/data", get(data::list_ids).post(data::create_data))
        .route(
            "/data/{id}",
            get(data::read_data)
                .put(data::update_data)
                .delete(data::delete_data),
        )
        .route("/users", get(users::list_users).post(users::register_user))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
