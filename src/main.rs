use std::sync::Arc;

use bookmarks::config::{Cli, Config};
use bookmarks::handler::AppState;
use bookmarks::repository::InMemoryBookmarkRepository;
use bookmarks::routes::app;
use bookmarks::server;
use bookmarks::service::DefaultBookmarkService;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("bookmarks.svc starting");

    let cfg = Config::load(args.env_file.as_deref()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to load config");
        std::process::exit(1);
    });

    let repo = InMemoryBookmarkRepository::new();
    let service = Arc::new(DefaultBookmarkService::new(repo));
    let router = app(AppState::new(service));

    let address = cfg.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, address = %address, "failed to setup tcp listener");
        std::process::exit(1);
    });

    let cancellation_token = CancellationToken::new();
    let server_token = cancellation_token.clone();
    let mut server = tokio::spawn(server::serve(
        listener,
        router,
        cfg.read_header_timeout,
        server_token,
    ));

    tracing::info!("bookmarks.svc running on {}", &address);
    tokio::select! {
        result = &mut server => {
            match result {
                Ok(()) => tracing::error!("server stopped unexpectedly"),
                Err(err) => tracing::error!(error = %err, "server task failed"),
            }
            std::process::exit(1);
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, preparing to shutdown");
            cancellation_token.cancel();
        }
    }

    match tokio::time::timeout(cfg.shutdown_timeout, &mut server).await {
        Ok(Ok(())) => {
            tracing::info!("bookmarks.svc going off, graceful shutdown complete");
        }
        Ok(Err(err)) => {
            tracing::error!(error = %err, "server task failed during shutdown");
            std::process::exit(1);
        }
        Err(_) => {
            tracing::error!(
                grace_period = ?cfg.shutdown_timeout,
                "server forced to shutdown, in-flight requests did not finish in time"
            );
            std::process::exit(1);
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
}
