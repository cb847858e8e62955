//! visitprom server
//!
//! - `GET /metrics`: every registered family in the text exposition format
//! - `GET /visit` (and any other path): counts the visit, greets the caller

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visitprom_core::error::{Result, VisitPromError};
use visitprom_server::{app_state::AppState, cli::{self, Cli}, server};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Cli::parse_from(cli::normalize_args(std::env::args_os()))).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "visitprom-server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = cli.resolve()?;
    let registry = prometheus::default_registry().clone();
    server::register_process_collector(&registry)?;

    let listener = server::bind(&cfg.server.listen).await?;
    let listen = listener
        .local_addr()
        .map_err(|e| VisitPromError::Internal(format!("local addr: {e}")))?;
    let state = AppState::new(cfg, registry)?;

    tracing::info!(%listen, "visitprom-server listening");
    server::serve(listener, state).await
}
