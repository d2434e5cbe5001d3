//! Optional startup import of user records from a remote JSON directory.

use crate::db::DataSource;
use crate::error::RosterError;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Deserialize)]
struct SeedUser {
    name: String,
    username: String,
    email: String,
}

/// Fetch a JSON array of user objects and insert each through `add_data`.
/// Runs only against an empty table; entries missing a field are skipped.
/// Returns the number of imported rows.
pub async fn import_users(source: &DataSource, seed_url: &Url) -> Result<usize, RosterError> {
    if !source.get_ids().await?.is_empty() {
        info!("user_data already populated, skipping seed import");
        return Ok(0);
    }

    let entries: Vec<Value> = reqwest::get(seed_url.as_str())
        .await?
        .error_for_status()?
        .json()
        .await?;

    let mut imported = 0usize;
    for entry in entries {
        match serde_json::from_value::<SeedUser>(entry) {
            Ok(user) => {
                source
                    .add_data(&user.name, &user.username, &user.email)
                    .await?;
                imported += 1;
            }
            Err(e) => warn!(error = %e, "skipping malformed seed entry"),
        }
    }

    info!(count = imported, url = %seed_url, "seeded user_data from remote directory");
    Ok(imported)
}
