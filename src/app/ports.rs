//! Port traits: the hexagonal boundary between the gatekeeper and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GatekeeperWorker (domain)
//! ```
//!
//! The bus adapter and the event sink implement these traits.  The
//! [`GatekeeperWorker`](crate::gatekeeper::GatekeeperWorker) consumes them
//! via generics, so the gatekeeper core never touches the I2C peripheral
//! directly.

use crate::error::TransportError;

// ───────────────────────────────────────────────────────────────
// Bus transport port (driven adapter: domain ↔ I2C peripheral)
// ───────────────────────────────────────────────────────────────

/// Transfer direction of one bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

/// One start / address+direction / data / stop transaction per call.
///
/// Implementations are not thread-safe; only the gatekeeper worker holds
/// one.  Each call must release the bus (issue STOP, free any command
/// handle) on every exit path, including failures.
pub trait BusTransport {
    /// Move one byte to or from the device at 7-bit `address`.
    ///
    /// For [`Direction::Write`] `data` is sent and echoed back on success.
    /// For [`Direction::Read`] `data` is ignored and the byte read is returned.
    fn transact(&mut self, address: u8, direction: Direction, data: u8)
    -> Result<u8, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The worker emits structured [`GatekeeperEvent`](super::events::GatekeeperEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::GatekeeperEvent);
}
