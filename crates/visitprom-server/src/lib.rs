//! visitprom server library entry.
//!
//! Wires config, the visit counter and the axum router. Used by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod cli;
pub mod config;
pub mod ops;
pub mod router;
pub mod server;
pub mod visit;
