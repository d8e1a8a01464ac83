//! Write-shadow cache for the expanders' output latches.
//!
//! A PCF8574 write replaces all eight outputs at once, so changing one bit
//! means rewriting the other seven from memory.  This table holds the last
//! byte successfully written to each device.

use heapless::Vec;

use crate::config::MAX_DEVICES;

/// Last-written output byte per device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowRegisters {
    bytes: Vec<u8, MAX_DEVICES>,
}

impl ShadowRegisters {
    /// Power-on latch state: all outputs high (weak pull-ups).
    pub const POWER_ON: u8 = 0xFF;

    /// Table for `devices` expanders, every byte at [`Self::POWER_ON`].
    pub fn new(devices: usize) -> Self {
        let mut bytes = Vec::new();
        for _ in 0..devices.min(MAX_DEVICES) {
            let _ = bytes.push(Self::POWER_ON);
        }
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Current shadow byte of `device`.
    pub fn get(&self, device: usize) -> Option<u8> {
        self.bytes.get(device).copied()
    }

    /// Byte to write so that `bit` becomes `value` and every other bit of
    /// `device` keeps its shadowed state.  Does not modify the table.
    /// `None` for an unknown device.
    pub fn compute_next(&self, device: usize, bit: u8, value: bool) -> Option<u8> {
        let current = self.get(device)?;
        let mask = 1u8 << (bit & 0x07);
        Some(if value { current | mask } else { current & !mask })
    }

    /// Record `byte` as the device's latch state and return the previous
    /// one.  Only call after the write transaction succeeded.  Unknown
    /// devices are ignored (`None`).
    pub fn commit(&mut self, device: usize, byte: u8) -> Option<u8> {
        let slot = self.bytes.get_mut(device)?;
        Some(core::mem::replace(slot, byte))
    }
}
