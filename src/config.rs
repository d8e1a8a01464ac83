//! System configuration parameters
//!
//! Bus wiring, timing, and the expander address table.  The defaults match
//! the reference board: two PCF8574A expanders at 0x38/0x39 on a 100 kHz bus.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::pins;

/// Maximum number of expanders on one bus (PCF8574 has three address pins).
pub const MAX_DEVICES: usize = 8;

/// Upper clock bound for I2C fast-mode.
const MAX_BUS_CLOCK_HZ: u32 = 400_000;

/// Longest accepted per-transaction timeout.
const MAX_TRANSACTION_TIMEOUT_MS: u32 = 60_000;

/// Expander flavour; only the base address differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpanderVariant {
    /// PCF8574: addresses 0x20..=0x27.
    Pcf8574,
    /// PCF8574A: addresses 0x38..=0x3F.
    Pcf8574A,
}

impl ExpanderVariant {
    /// 7-bit address of the device with all address pins low.
    pub const fn base_address(self) -> u8 {
        match self {
            Self::Pcf8574 => 0x20,
            Self::Pcf8574A => 0x38,
        }
    }
}

/// Gatekeeper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    // --- Bus wiring ---
    /// GPIO carrying SDA
    pub i2c_sda_gpio: i32,
    /// GPIO carrying SCL
    pub i2c_scl_gpio: i32,
    /// Bus clock in Hz
    pub bus_clock_hz: u32,

    // --- Timing ---
    /// Upper bound on one bus transaction (milliseconds)
    pub transaction_timeout_ms: u32,

    // --- Devices ---
    /// 7-bit device addresses; index `n` serves logical ports `8n..8n+8`
    pub devices: Vec<u8, MAX_DEVICES>,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self::for_variant(ExpanderVariant::Pcf8574A, 2)
    }
}

impl GatekeeperConfig {
    /// Config for `count` consecutive devices of one variant, default wiring.
    pub fn for_variant(variant: ExpanderVariant, count: usize) -> Self {
        let base = variant.base_address();
        let devices = (0..count.min(MAX_DEVICES))
            .map(|i| base + i as u8)
            .collect();

        Self {
            i2c_sda_gpio: pins::I2C_SDA_GPIO,
            i2c_scl_gpio: pins::I2C_SCL_GPIO,
            bus_clock_hz: 100_000,       // standard mode
            transaction_timeout_ms: 1000, // 1 s
            devices,
        }
    }

    /// Transaction timeout in RTOS ticks at `tick_rate_hz`, rounded down
    /// but never below one tick.
    pub fn timeout_ticks(&self, tick_rate_hz: u32) -> u32 {
        let ticks = u64::from(self.transaction_timeout_ms) * u64::from(tick_rate_hz) / 1000;
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }

    /// Number of logical ports served (`devices * 8`).
    pub fn port_count(&self) -> usize {
        self.devices.len() * 8
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.devices.is_empty() {
            return Err(Error::Config("no devices configured"));
        }
        if self.devices.iter().any(|&addr| addr > 0x7F) {
            return Err(Error::Config("device address exceeds 7 bits"));
        }
        for (i, addr) in self.devices.iter().enumerate() {
            if self.devices[i + 1..].contains(addr) {
                return Err(Error::Config("duplicate device address"));
            }
        }
        if self.transaction_timeout_ms == 0 {
            return Err(Error::Config("transaction timeout must be non-zero"));
        }
        if self.transaction_timeout_ms > MAX_TRANSACTION_TIMEOUT_MS {
            return Err(Error::Config("transaction timeout above 60 s"));
        }
        if self.bus_clock_hz == 0 || self.bus_clock_hz > MAX_BUS_CLOCK_HZ {
            return Err(Error::Config("bus clock outside 1..=400000 Hz"));
        }
        if self.i2c_sda_gpio == self.i2c_scl_gpio {
            return Err(Error::Config("SDA and SCL share a GPIO"));
        }
        Ok(())
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }
}
