use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::mpsc::channel;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use log::{error, info};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

use crate::builder::BuildContext;
use crate::server::core::watcher::handle_file_changes;
use crate::server::handlers::static_files_router;
use crate::server::livereload::{livereload_handler, LiveReloadHub, LIVERELOAD_PATH};
use crate::server::watch::start_watching;
use crate::utils::error::{AlvuError, BoxResult};

/// Shared state for request handlers
#[derive(Debug, Clone)]
pub struct ServerState {
    pub out_dir: PathBuf,
    pub hub: Arc<LiveReloadHub>,
}

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route(LIVERELOAD_PATH, get(livereload_handler))
        .merge(static_files_router(state.out_dir.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the built site and rebuild on changes until Ctrl+C.
///
/// The site is expected to be built already. Returns an error when the
/// watcher fails, since builds can no longer be trusted to be current.
pub async fn serve(ctx: BuildContext) -> BoxResult<()> {
    let ctx = Arc::new(ctx);
    let hub = Arc::new(LiveReloadHub::new());
    let port = ctx.config.port;

    let (tx, rx) = channel();
    let _watcher = start_watching(&ctx.config, tx)?;

    let (done_tx, done_rx) = oneshot::channel();
    {
        let ctx = ctx.clone();
        let hub = hub.clone();
        std::thread::Builder::new()
            .name("alvu-rebuild".to_string())
            .spawn(move || {
                let _ = done_tx.send(handle_file_changes(rx, &ctx, &hub));
            })?;
    }

    let state = ServerState {
        out_dir: ctx.config.destination.clone(),
        hub,
    };
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AlvuError::Server(format!("cannot listen on port {}: {}", port, e)))?;
    info!("Serving {} at http://localhost:{}", ctx.config.destination.display(), port);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(AlvuError::Server(e.to_string()).into());
            }
            info!("Server stopped");
        },
        result = done_rx => {
            if let Ok(Err(e)) = result {
                return Err(e.into());
            }
            info!("Watcher stopped");
        },
        _ = signal::ctrl_c() => {
            info!("Shutting down server (received Ctrl+C)...");
        },
    }

    Ok(())
}
