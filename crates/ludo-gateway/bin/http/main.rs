mod cli;

use crate::cli::{Command, CLI};
use anyhow::{bail, Context};
use clap::Parser;
use ludo_catalog::GameAuthorConnector;
use ludo_core::Store;
use ludo_gateway::{App, AppState, GatewayConfig, StorageBackend};
use ludo_storage::{InMemoryStore, PgStore};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CLI::try_parse()?;
    let command = cli.command();
    let config = cli.config();

    let _telemetry = ludo_telemetry::init(&config.telemetry)?;

    info!(
        profile = ?config.profile,
        listen_addr = %config.listen_addr,
        storage_backend = %cli.storage,
        command = ?command,
        "starting ludo gateway"
    );

    match command {
        Command::Serve => serve(config).await,
        Command::Migrate => migrate(config).await,
    }
}

async fn serve(config: GatewayConfig) -> anyhow::Result<()> {
    match config.storage {
        StorageBackend::InMemory => run_server(config.listen_addr, InMemoryStore::new()).await,
        StorageBackend::Postgres => {
            let store = connect_postgres(&config).await?;
            if config.auto_migrate {
                apply_migrations(&store, &config).await?;
            }
            run_server(config.listen_addr, store).await
        }
    }
}

async fn migrate(config: GatewayConfig) -> anyhow::Result<()> {
    if config.storage != StorageBackend::Postgres {
        bail!("migrate requires --storage postgres");
    }
    let store = connect_postgres(&config).await?;
    apply_migrations(&store, &config).await
}

async fn connect_postgres(config: &GatewayConfig) -> anyhow::Result<PgStore> {
    let database_url = config
        .database_url
        .as_deref()
        .context("database url is required when storage backend is postgres")?;
    let store = PgStore::connect(database_url, config.max_connections)
        .await
        .context("failed to connect to postgres")?;
    Ok(store)
}

async fn apply_migrations(store: &PgStore, config: &GatewayConfig) -> anyhow::Result<()> {
    match &config.migrations_dir {
        Some(dir) => store.migrate_from(dir).await?,
        None => store.migrate().await?,
    }
    Ok(())
}

async fn run_server<S: Store>(listen_addr: SocketAddr, store: S) -> anyhow::Result<()> {
    let catalog = GameAuthorConnector::new(store);
    let app = App::router(AppState::new(Arc::new(catalog)));

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "serving http");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await;
}

/// Resolves once `signal` fires. If the signal cannot be installed this never
/// resolves, so the server keeps running instead of stopping at once.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("received ctrl-c, shutting down"),
        Err(err) => {
            error!(error = %err, "failed to listen for ctrl-c, graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::time::Duration;

    #[tokio::test]
    async fn shutdown_follows_the_signal() {
        let result =
            tokio::time::timeout(Duration::from_millis(100), wait_for_shutdown(async { Ok(()) }))
                .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn failed_signal_never_triggers_shutdown() {
        let failing = async { Err(io::Error::other("no signal handler")) };
        let result =
            tokio::time::timeout(Duration::from_millis(100), wait_for_shutdown(failing)).await;
        assert!(result.is_err());
    }
}
