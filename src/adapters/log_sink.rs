//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing gatekeeper events to the logger
//! (UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::GatekeeperEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`GatekeeperEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &GatekeeperEvent) {
        match event {
            GatekeeperEvent::DeviceProbed {
                index,
                address,
                error: None,
            } => {
                info!("PROBE | dev {} @ 0x{:02X} present", index, address);
            }
            GatekeeperEvent::DeviceProbed {
                index,
                address,
                error: Some(e),
            } => {
                warn!("PROBE | dev {} @ 0x{:02X} NOT RESPONDING: {}", index, address, e);
            }
            GatekeeperEvent::Ready(report) => {
                info!(
                    "READY | devices={} present=0b{:08b}",
                    report.devices, report.present
                );
            }
            GatekeeperEvent::TransactionFailed {
                address,
                direction,
                error,
            } => {
                warn!("BUS   | {:?} @ 0x{:02X} failed: {}", direction, address, error);
            }
        }
    }
}
