//! Gatekeeper: serialized access to the shared expander bus.
//!
//! One worker owns the [`BusTransport`](crate::app::ports::BusTransport)
//! and the shadow registers.  Any number of clients talk to it through a
//! bounded request channel and get their answers back through a private
//! single-slot mailbox.
//!
//! ```text
//! ┌──────────┐  Request   ┌─────────────────┐  transact  ┌───────────┐
//! │ Client A │──────────▶│                 │──────────▶│           │
//! │ Client B │──────────▶│ GatekeeperWorker│           │ I2C bus   │
//! │   ...    │  (FIFO, 8) │  + shadow cache │◀──────────│ (PCF8574) │
//! └──────────┘            └────────┬────────┘            └───────────┘
//!      ▲                           │
//!      └───── Reply (mailbox) ─────┘
//! ```
//!
//! Clients block on the readiness signal until the worker has probed every
//! device once at startup.

mod client;
mod port;
mod protocol;
mod shadow;
mod worker;

pub use client::Client;
pub use port::LogicalPort;
pub use protocol::{Command, Reply, ReplyTarget, Request};
pub use shadow::ShadowRegisters;
pub use worker::{GatekeeperWorker, WorkerState};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::watch::Watch;
use heapless::Vec;
use log::info;

use crate::app::events::ProbeReport;
use crate::config::{GatekeeperConfig, MAX_DEVICES};
use crate::error::{RangeError, Result};

/// Channel depth for inbound requests (expected burst concurrency).
pub const REQUEST_QUEUE_DEPTH: usize = 8;

/// Clients that can park on the readiness signal at the same time.
/// Further waiters re-poll until a slot frees up; once readiness is
/// published nobody waits at all.
pub const READY_WAITERS: usize = 8;

/// Process-wide gatekeeper state, created once at startup.
///
/// Shared by reference between the worker and every client.  Clients only
/// push requests and wait on readiness; everything else belongs to the
/// worker.
pub struct Gatekeeper {
    /// Many-to-one request channel: clients → worker.
    pub(crate) requests: Channel<CriticalSectionRawMutex, Request, REQUEST_QUEUE_DEPTH>,
    /// One-shot readiness gate, published by the worker after probing.
    pub(crate) ready: Watch<CriticalSectionRawMutex, ProbeReport, READY_WAITERS>,
    /// 7-bit address of each device, indexed by `port / 8`.
    addresses: Vec<u8, MAX_DEVICES>,
}

impl Gatekeeper {
    /// Validate `config` and build the shared state.
    pub fn new(config: &GatekeeperConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Gatekeeper: {} device(s), {} ports, queue depth {}",
            config.devices.len(),
            config.port_count(),
            REQUEST_QUEUE_DEPTH
        );
        Ok(Self {
            requests: Channel::new(),
            ready: Watch::new(),
            addresses: config.devices.clone(),
        })
    }

    /// Number of expanders on the bus.
    pub fn device_count(&self) -> usize {
        self.addresses.len()
    }

    /// Number of logical ports (`devices * 8`).
    pub fn port_count(&self) -> usize {
        self.addresses.len() * 8
    }

    /// Address of device `index`, if configured.
    pub fn address(&self, index: usize) -> Option<u8> {
        self.addresses.get(index).copied()
    }

    /// Range-check a raw port number against this gatekeeper's devices.
    pub fn port(&self, raw: u8) -> core::result::Result<LogicalPort, RangeError> {
        LogicalPort::new(raw, self.device_count())
    }

    /// Create a new client.  There is no limit on how many exist.
    pub fn client(&self) -> Client<'_> {
        Client::new(self)
    }

    /// Requests currently waiting for the worker.
    pub fn pending(&self) -> usize {
        self.requests.len()
    }
}
