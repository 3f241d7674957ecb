//! HTTP API over the leaderboard engine
//!
//! ## Endpoints
//!
//! - `GET /healthz` - liveness probe
//! - `GET /api/{source}/snapshot` - fetch, cache and describe a snapshot
//! - `POST /api/{source}/page` - JSON page for a snapshot token or inline result set
//! - `GET /{source}/page` - the same page as an HTML fragment

pub mod handlers;
pub mod render;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::core::{LeaderboardFetcher, Paginator};
use crate::error::{LbError, Result};
use crate::snapshot::SnapshotCache;

/// Shared state handed to every handler.
pub struct ServerState {
    pub paginator: Paginator,
    pub fetcher: Arc<dyn LeaderboardFetcher + Send + Sync>,
    pub cache: SnapshotCache,
    pub default_page_size: usize,
    pub layout: render::FragmentLayout,
}

pub type SharedState = Arc<ServerState>;

impl ServerState {
    #[must_use]
    pub fn new(config: &Config, fetcher: Arc<dyn LeaderboardFetcher + Send + Sync>) -> Self {
        Self {
            paginator: Paginator::new(config.display.clone()),
            fetcher,
            cache: SnapshotCache::from_config(&config.cache),
            default_page_size: config.pagination.default_page_size,
            layout: render::FragmentLayout::from_config(config),
        }
    }
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route("/api/{source}/snapshot", get(handlers::snapshot))
        .route("/api/{source}/page", post(handlers::page_json))
        .route("/{source}/page", get(handlers::page_html))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
}

/// Bind `addr` and serve until ctrl-c or SIGTERM.
pub async fn serve(state: SharedState, addr: &str) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|err| LbError::Config(format!("invalid bind address {addr:?}: {err}")))?;
    let router = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    info!(target: "server", addr = %listener.local_addr()?, "binding HTTP listener");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!(target: "server", "HTTP server exited");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
