//! Server config loader (strict parsing).

pub mod schema;

use std::fs;

use visitprom_core::error::{Result, VisitPromError};

pub use schema::{MetricsSection, ServerConfig, ServerSection};

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| VisitPromError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| VisitPromError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Bind targets for a listen address, in preference order.
///
/// The address is `host:port`, where the host may be a name. A bare `:PORT`
/// means every interface: the IPv6 wildcard first (dual-stack where the OS
/// allows), then the IPv4 wildcard. Names are resolved at bind time.
pub fn listen_targets(s: &str) -> Result<Vec<String>> {
    let invalid = |why: &str| VisitPromError::BadRequest(format!("invalid listen address {s:?}: {why}"));

    let (host, port) = s.rsplit_once(':').ok_or_else(|| invalid("missing port"))?;
    let port: u16 = port.parse().map_err(|_| invalid("port must be a number"))?;

    if host.is_empty() {
        return Ok(vec![format!("[::]:{port}"), format!("0.0.0.0:{port}")]);
    }
    if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
        return Err(invalid("IPv6 hosts must be bracketed"));
    }
    Ok(vec![s.to_string()])
}
