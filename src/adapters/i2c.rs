//! `embedded-hal` I2C adapter.
//!
//! Implements [`BusTransport`] for any [`embedded_hal::i2c::I2c`] bus.
//! Every `read`/`write` is a single embedded-hal transaction, which by
//! contract ends with a STOP even when an operation fails, so the bus is
//! always released before the next request.

use embedded_hal::i2c::{Error as _, I2c};

use crate::app::ports::{BusTransport, Direction};
use crate::error::TransportError;

/// Wraps an owned embedded-hal I2C bus.
pub struct HalBus<I> {
    i2c: I,
}

impl<I: I2c> HalBus<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Give back the underlying bus.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> BusTransport for HalBus<I> {
    fn transact(
        &mut self,
        address: u8,
        direction: Direction,
        data: u8,
    ) -> Result<u8, TransportError> {
        match direction {
            Direction::Write => self
                .i2c
                .write(address, &[data])
                .map(|()| data)
                .map_err(|e| TransportError::from(e.kind())),
            Direction::Read => {
                let mut buf = [0u8; 1];
                self.i2c
                    .read(address, &mut buf)
                    .map_err(|e| TransportError::from(e.kind()))?;
                Ok(buf[0])
            }
        }
    }
}
