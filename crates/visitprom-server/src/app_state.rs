//! Shared application state for the visit server.
//!
//! Holds the config, the registry served at `/metrics`, and the `Prom`
//! wrapper with the visit counter family configured. Startup errors are
//! returned, not panicked.

use std::sync::Arc;

use prometheus::Registry;
use visitprom_core::error::Result;
use visitprom_core::Prom;

use crate::config::ServerConfig;

/// Label names of the visit counter. The first value is always the counter name.
pub const VISIT_LABELS: &[&str] = &["name", "uri", "service_addr"];

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    registry: Registry,
    prom: Prom,
}

impl AppState {
    /// Build state and register the visit counter with `registry`.
    pub fn new(cfg: ServerConfig, registry: Registry) -> Result<Self> {
        let prom = Prom::new(registry.clone()).with_counter(
            &cfg.metrics.counter_name,
            &cfg.metrics.counter_help,
            VISIT_LABELS,
        )?;

        tracing::debug!(counter = %cfg.metrics.counter_name, "visit counter registered");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                prom,
            }),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn prom(&self) -> &Prom {
        &self.inner.prom
    }
}
