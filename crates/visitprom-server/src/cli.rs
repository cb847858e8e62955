//! Command line flags.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use visitprom_core::error::{Result, VisitPromError};

use crate::config::{self, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "visitprom-server", about = "Counts visits and serves them for Prometheus scraping")]
pub struct Cli {
    /// The address to listen on for HTTP requests [default: :8080].
    /// The single-dash spelling `-listen-address` is accepted too.
    #[arg(long = "listen-address", value_name = "ADDR")]
    pub listen_address: Option<String>,

    /// Optional YAML config file (`-config` is accepted too).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load the config file (or defaults) and apply flag overrides.
    pub fn resolve(&self) -> Result<ServerConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let path = path.to_str().ok_or_else(|| {
                    VisitPromError::BadRequest(format!("config path is not utf-8: {}", path.display()))
                })?;
                config::load_from_file(path)?
            }
            None => ServerConfig::default(),
        };
        if let Some(listen) = &self.listen_address {
            cfg.server.listen = listen.clone();
            cfg.server.validate()?;
        }
        Ok(cfg)
    }
}

/// Rewrite single-dash long flags (`-listen-address`, `-config`, with or
/// without `=value`) to their `--` form so clap accepts them.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    const LONG_FLAGS: [&str; 2] = ["listen-address", "config"];

    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            let Some(s) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = s.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let flag = rest.split_once('=').map_or(rest, |(f, _)| f);
            if LONG_FLAGS.contains(&flag) {
                OsString::from(format!("-{s}"))
            } else {
                arg
            }
        })
        .collect()
}
