//! Domain events emitted by the gatekeeper worker.

use crate::app::ports::Direction;
use crate::error::TransportError;

/// Outcome of the startup probe, published with the readiness signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    /// Number of configured devices.
    pub devices: u8,
    /// Bit `n` set when device `n` acknowledged the probe write.
    pub present: u8,
}

impl ProbeReport {
    /// Whether device `index` answered the probe.
    pub fn is_present(&self, index: usize) -> bool {
        index < self.devices as usize && self.present & (1 << index) != 0
    }

    /// Whether every configured device answered.
    pub fn all_present(&self) -> bool {
        (0..self.devices as usize).all(|i| self.is_present(i))
    }
}

/// Structured events the worker emits through its [`EventSink`](super::ports::EventSink).
#[derive(Debug, Clone, PartialEq)]
pub enum GatekeeperEvent {
    /// A device was probed at startup.  `error` is the probe warning, if any.
    DeviceProbed {
        index: usize,
        address: u8,
        error: Option<TransportError>,
    },
    /// Probing finished; clients are released.
    Ready(ProbeReport),
    /// A request's bus transaction failed; the error went to its requester.
    TransactionFailed {
        address: u8,
        direction: Direction,
        error: TransportError,
    },
}
