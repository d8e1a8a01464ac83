//! Logical port addressing across several 8-bit expanders.

use crate::error::RangeError;

/// Bits per expander.
const BITS_PER_DEVICE: usize = 8;

/// A flattened bit address: `device = port / 8`, `bit = port % 8`.
///
/// Only constructible through a range check, so every value that reaches
/// the worker names a configured device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalPort(u8);

impl LogicalPort {
    /// Check `port` against `devices * 8`.
    pub fn new(port: u8, devices: usize) -> Result<Self, RangeError> {
        let limit = devices * BITS_PER_DEVICE;
        if (port as usize) < limit {
            Ok(Self(port))
        } else {
            Err(RangeError {
                port,
                limit: limit.min(u8::MAX as usize) as u8,
            })
        }
    }

    /// Index of the expander serving this port.
    pub const fn device(self) -> usize {
        self.0 as usize / BITS_PER_DEVICE
    }

    /// Bit position within the expander's byte.
    pub const fn bit(self) -> u8 {
        self.0 % BITS_PER_DEVICE as u8
    }
}

impl core::fmt::Display for LogicalPort {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "P{} (dev {} bit {})", self.0, self.device(), self.bit())
    }
}
