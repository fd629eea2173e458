use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;

use filmwiki::app::movie_store::{LocalFsMovieStore, MovieStore};
use filmwiki::app::routes::{AppState, router};
use filmwiki::config::WikiConfig;
use filmwiki::enrich::Enricher;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Movie store directory.
    #[arg(long, default_value = "workspace-app")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    filmwiki::logging::init()?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting filmwiki-app");

    let config = WikiConfig::from_env();
    tracing::info!(
        base_url = %config.base_url,
        fetch_timeout_secs = config.fetch_timeout.as_secs(),
        "using wiki content source"
    );

    let store: Arc<dyn MovieStore> = Arc::new(LocalFsMovieStore::new(args.data_dir.clone()));
    let enricher = Enricher::online(config).context("build enricher")?;
    let app = router(AppState { store, enricher });

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
