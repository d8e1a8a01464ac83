//! IoGate firmware library.
//!
//! Exposes the gatekeeper, its ports, and the adapters for integration
//! testing.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod gatekeeper;
pub mod pins;

pub use error::{Error, RangeError, Result, TransportError};
pub use gatekeeper::{Client, Gatekeeper, GatekeeperWorker};
