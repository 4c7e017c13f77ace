//! HTTP server lifecycle.

use std::future::Future;
use std::net::SocketAddr;

use fontpanel_core::{AppState, ConfigProvider, Error, Result};
use tokio::net::TcpListener;

use crate::router::{RouterOptions, router};

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve<C: ConfigProvider>(
    state: AppState<C>,
    addr: SocketAddr,
    options: RouterOptions,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("could not bind {addr}: {e}")))?;
    serve_with_listener(listener, state, options, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_with_listener<C, F>(
    listener: TcpListener,
    state: AppState<C>,
    options: RouterOptions,
    shutdown: F,
) -> Result<()>
where
    C: ConfigProvider,
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener.local_addr().map_err(Error::io)?;
    tracing::info!(
        address = %local,
        project = state.project_name(),
        css = %state.store().css_path().display(),
        auth = state.api_key().is_some(),
        "font panel listening"
    );

    axum::serve(listener, router(state, options))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(Error::io)?;

    tracing::info!("font panel stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not listen for Ctrl-C; shutting down");
    }
}
