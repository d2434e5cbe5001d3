use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Runtime configuration, merged from defaults and `ROSTER_`-prefixed
/// environment variables (`ROSTER_DATABASE_URL`, `ROSTER_BIND_ADDR`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection string for the backing SQLite store.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Default log level when `RUST_LOG` is unset.
    pub loglevel: String,
    /// Optional remote JSON user directory imported into an empty store at
    /// startup.
    pub seed_url: Option<Url>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:roster.sqlite3".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            seed_url: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("ROSTER_"))
            .extract()
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| {
        eprintln!("configuration error: {e}");
        std::process::exit(1)
    })
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_store() {
        let cfg = Config::default();
        assert_eq!(cfg.database_url, "sqlite:roster.sqlite3");
        assert_eq!(cfg.bind_addr, "0.0.0.0:8000");
        assert!(cfg.seed_url.is_none());
    }
}
