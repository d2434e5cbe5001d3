use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &roster::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        bind_addr = %cfg.bind_addr,
        loglevel = %cfg.loglevel,
    );

    let pool = roster::db::connect(&cfg.database_url).await?;
    roster::db::init_schema(&pool).await?;

    let data = roster::db::DataSource::new(pool.clone());
    let credentials = roster::db::CredentialsSource::new(pool);

    if let Some(seed_url) = cfg.seed_url.as_ref()
        && let Err(e) = roster::service::seed::import_users(&data, seed_url).await
    {
        warn!(url = %seed_url, error = %e, "seed import failed");
    }

    let state = roster::router::RosterState::new(data, credentials);
    let app = roster::router::roster_router(state);

    let listener = TcpListener::bind(cfg.bind_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            info!("received SIGTERM, starting shutdown");
        }
    }
}
