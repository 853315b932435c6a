use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use userhub_api::{build_router, AppState};
use userhub_core::services::DirectoryService;
use userhub_infrastructure::{
    create_pool, SqliteGroupRepository, SqliteMembershipRepository, SqliteStore,
    SqliteUserRepository,
};
use userhub_replication::ReplicationSupervisor;
use userhub_shared::config::AppConfig;
use userhub_shared::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let _log_guard = init_telemetry(&config.log)?;

    info!("{} starting (env: {})", config.app.name, config.app.env);

    // Store first: restore and schema creation must finish before serving.
    let store = SqliteStore::new(config.database.clone());
    let mut supervisor = ReplicationSupervisor::from_settings(&config.replication);
    supervisor
        .prepare_store(&store)
        .await
        .context("failed to prepare database")?;
    supervisor.start_replication();

    let pool = create_pool(&config.database)
        .await
        .context("failed to open database")?;
    info!("Database connection established");

    let directory = DirectoryService::new(
        Arc::new(SqliteUserRepository::new(pool.clone())),
        Arc::new(SqliteGroupRepository::new(pool.clone())),
        Arc::new(SqliteMembershipRepository::new(pool.clone())),
    );
    let app = build_router(AppState::new(directory));

    let host: std::net::IpAddr = config.app.host.parse().context("invalid app.host")?;
    let addr = SocketAddr::from((host, config.app.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Stop replication even when serving failed.
    let outcome = supervisor.shutdown().await;
    info!("Replication shutdown: {:?}", outcome);
    pool.close().await;

    served.context("server error")?;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
