//! Application layer: domain events, port traits, and the tasks that use
//! the gatekeeper.
//!
//! All interaction with hardware happens through the **port traits** in
//! [`ports`], keeping the gatekeeper testable without real peripherals.

pub mod events;
pub mod ports;
pub mod tasks;
