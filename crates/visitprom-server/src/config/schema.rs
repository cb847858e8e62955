use serde::Deserialize;
use visitprom_core::error::{Result, VisitPromError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VisitPromError::BadRequest(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.server.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Reported in the `service_addr` label of every visit.
    #[serde(default = "default_service_addr")]
    pub service_addr: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            service_addr: default_service_addr(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        super::listen_targets(&self.listen)?;
        if self.service_addr.is_empty() {
            return Err(VisitPromError::BadRequest(
                "server.service_addr must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_counter_name")]
    pub counter_name: String,

    #[serde(default = "default_counter_help")]
    pub counter_help: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            counter_name: default_counter_name(),
            counter_help: default_counter_help(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.counter_name.is_empty() {
            return Err(VisitPromError::BadRequest(
                "metrics.counter_name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    ":8080".into()
}
fn default_service_addr() -> String {
    "127.0.0.1:8080".into()
}
fn default_counter_name() -> String {
    "demo_queries".into()
}
fn default_counter_help() -> String {
    "demo http query counter".into()
}
