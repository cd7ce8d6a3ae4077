//! Server lifecycle: `Starting → Serving → Draining → Stopped`.
//!
//! - **Starting**: [`bind`] the listen address. Failure is fatal to the caller.
//! - **Serving**: [`serve`] accepts connections, one task per connection.
//! - **Draining**: once the shutdown future resolves, no new connections are
//!   accepted and in-flight requests get `grace` to finish.
//! - **Stopped**: `serve` returns `Ok` if the drain finished in time, or
//!   [`ServerError::DrainTimeout`] if requests were still running.

use std::future::{Future, IntoFuture};
use std::io;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Grace period used when configuration does not override it.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    #[error("graceful shutdown did not finish within {0:?}; requests were still in flight")]
    DrainTimeout(Duration),
}

/// Bind the listener for `addr`.
pub async fn bind(addr: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serve `app` until `shutdown` resolves, then drain for at most `grace`.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "server listening");
    }

    let (draining_tx, draining_rx) = oneshot::channel::<()>();
    let signal = async move {
        shutdown.await;
        tracing::info!(grace_ms = millis(grace), "shutting down server gracefully");
        let _ = draining_tx.send(());
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(signal)
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        biased;
        res = &mut server => {
            // Stopped without a shutdown request.
            return res.map_err(ServerError::Serve);
        }
        _ = draining_rx => {}
    }

    match tokio::time::timeout(grace, server).await {
        Ok(res) => {
            res.map_err(ServerError::Serve)?;
            tracing::info!("server shutdown successfully");
            Ok(())
        }
        Err(_) => {
            tracing::error!(grace_ms = millis(grace), "failed to shutdown server gracefully");
            Err(ServerError::DrainTimeout(grace))
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Resolves on SIGINT (Ctrl+C) or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received interrupt signal"),
        () = terminate => tracing::info!("received terminate signal"),
    }
}
