//! Listener binding and the serve loop.

use std::io;

use prometheus::Registry;
use tokio::net::TcpListener;
use visitprom_core::error::{Result, VisitPromError};

use crate::{app_state::AppState, config, router};

/// Bind the HTTP listener on `listen` (`host:port` or `:port`). Failure is
/// fatal for the process.
pub async fn bind(listen: &str) -> Result<TcpListener> {
    let mut last = None;
    for target in config::listen_targets(listen)? {
        match TcpListener::bind(target.as_str()).await {
            Ok(listener) => return Ok(listener),
            // The port is taken; the next wildcard would collide too.
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                last = Some(e);
                break;
            }
            Err(e) => {
                tracing::debug!(%target, error = %e, "bind attempt failed");
                last = Some(e);
            }
        }
    }
    Err(VisitPromError::Bind {
        addr: listen.to_string(),
        source: last.unwrap_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no bind target")),
    })
}

/// Register the `process_*` collector (CPU, memory, fds, start time) with
/// `registry`. Already registered counts as success.
#[cfg(target_os = "linux")]
pub fn register_process_collector(registry: &Registry) -> Result<()> {
    let collector = prometheus::process_collector::ProcessCollector::for_self();
    match registry.register(Box::new(collector)) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(source) => Err(VisitPromError::Registration {
            name: "process".into(),
            source,
        }),
    }
}

#[cfg(not(target_os = "linux"))]
pub fn register_process_collector(_registry: &Registry) -> Result<()> {
    Ok(())
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = router::build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| VisitPromError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
