//! Unified error types for the gatekeeper firmware.
//!
//! A single `Error` enum that every client-facing call returns, with the
//! bus-level [`TransportError`] nested inside it.  All variants are `Copy`
//! so they travel through the reply mailbox without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible client operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The bus transaction for this request failed.
    Transport(TransportError),
    /// A logical port outside `[0, devices * 8)` was requested.
    PortOutOfRange(RangeError),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::PortOutOfRange(e) => write!(f, "range: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failure of a single start/address/data/stop transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Misplaced START/STOP or other bus-level error.
    Bus,
    /// Another master won arbitration.
    ArbitrationLoss,
    /// The device did not acknowledge its address or the data byte.
    NoAcknowledge,
    /// Peripheral FIFO overrun.
    Overrun,
    /// The transaction did not complete within the configured timeout.
    Timeout,
    /// The request named a device index with no configured address.
    UnknownDevice,
    /// Driver-specific failure code.
    Other(i32),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "bus error"),
            Self::ArbitrationLoss => write!(f, "arbitration lost"),
            Self::NoAcknowledge => write!(f, "no acknowledge"),
            Self::Overrun => write!(f, "overrun"),
            Self::Timeout => write!(f, "timed out"),
            Self::UnknownDevice => write!(f, "unknown device"),
            Self::Other(code) => write!(f, "driver error (rc={})", code),
        }
    }
}

impl core::error::Error for TransportError {}

impl From<embedded_hal::i2c::ErrorKind> for TransportError {
    fn from(kind: embedded_hal::i2c::ErrorKind) -> Self {
        use embedded_hal::i2c::ErrorKind;

        match kind {
            ErrorKind::Bus => Self::Bus,
            ErrorKind::ArbitrationLoss => Self::ArbitrationLoss,
            ErrorKind::NoAcknowledge(_) => Self::NoAcknowledge,
            ErrorKind::Overrun => Self::Overrun,
            _ => Self::Other(-1),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Range errors
// ---------------------------------------------------------------------------

/// A logical port number outside the configured device range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeError {
    /// The rejected port number.
    pub port: u8,
    /// Exclusive upper bound (`devices * 8`).
    pub limit: u8,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {} outside 0..{}", self.port, self.limit)
    }
}

impl From<RangeError> for Error {
    fn from(e: RangeError) -> Self {
        Self::PortOutOfRange(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
