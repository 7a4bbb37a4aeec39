// ============================
// hwcatalog-backend-bin/src/main.rs
// ============================
//! Hardware catalog server entry point.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hwcatalog_backend_lib::{
    config::{Settings, StorageKind},
    create_router,
    events::BroadcastPublisher,
    storage::{FlatFileStorage, MemoryStorage, Storage},
    AppState,
};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hwcatalog-server", version, about = "Hardware catalog HTTP service")]
struct Cli {
    /// Configuration file (defaults to ./hwcatalog.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Directory holding the JSON tables
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }
    if cli.memory {
        settings.storage = StorageKind::Memory;
    }

    init_tracing(&settings);

    let events = BroadcastPublisher::new(settings.events.capacity);
    let _drain = events.spawn_log_drain();
    let events = Arc::new(events);

    match settings.storage {
        StorageKind::File => {
            let storage = FlatFileStorage::new(&settings.data_dir).with_context(|| {
                format!("opening data directory {}", settings.data_dir.display())
            })?;
            info!(data_dir = %settings.data_dir.display(), "using flat-file storage");
            run(AppState::new(storage, settings, events)?).await
        },
        StorageKind::Memory => {
            info!("using in-memory storage");
            run(AppState::new(MemoryStorage::new(), settings, events)?).await
        },
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_ascii_lowercase()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if settings.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run<S: Storage>(state: AppState<S>) -> anyhow::Result<()> {
    let addr = state.settings.bind_addr;
    let state = Arc::new(state);
    let app = create_router(Arc::clone(&state));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown();
    info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
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
