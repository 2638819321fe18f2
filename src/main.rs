use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use numgen::auth::{password, session::SessionStore};
use numgen::db::Storage;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &numgen::config::CONFIG;

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
        session_ttl_hours = cfg.session_ttl_hours,
    );

    let storage = Storage::connect(&cfg.database_url).await?;

    // Best-effort: a failed seed is logged, not fatal. Admin login will fail
    // until the underlying problem is fixed, but public routes keep working.
    match password::hash(&cfg.admin_password) {
        Ok(hash) => {
            if let Err(e) = storage.seed_admin(&cfg.admin_username, &hash).await {
                warn!(error = %e, "failed to seed admin account");
            } else {
                info!(username = %cfg.admin_username, "admin account ready");
            }
        }
        Err(e) => warn!(error = %e, "failed to hash admin password; seeding skipped"),
    }

    let sessions = Arc::new(SessionStore::new(chrono::Duration::hours(
        cfg.session_ttl_hours,
    )));
    let state = numgen::router::AppState::new(storage, sessions);
    let app = numgen::router::numgen_router(state);

    let listener = TcpListener::bind(&cfg.bind_addr).await?;
    info!("HTTP server listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            // without a handler there is no signal to wait for; serve forever
            warn!(error = %e, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    }
}
