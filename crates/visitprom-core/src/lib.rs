//! visitprom core: the metric registry wrapper and the shared error type.
//!
//! `Prom` owns at most one counter, one gauge and one timer family, each
//! registered once with an injected `prometheus::Registry`. The server crate
//! builds on it; nothing here depends on a runtime or transport.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Collector failures,
//! registration conflicts and wrong label counts surface as `VisitPromError`.
//! One caller contract is not checked: `Prom::add` with a negative value
//! panics inside the collector in debug builds.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod family;
pub mod prom;

pub use error::{ErrorCode, Result, VisitPromError};
pub use family::{Family, FamilyKind, FamilySchema};
pub use prom::{encode_text, Configure, Prom, Recorder};
