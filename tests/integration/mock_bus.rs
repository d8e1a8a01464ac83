//! Simulated PCF8574 bus for integration tests.
//!
//! Implements `embedded_hal::i2c::I2c` so the gatekeeper runs through the
//! real [`HalBus`] adapter.  State lives behind an `Arc<Mutex<_>>` so a test
//! can inspect the transaction log while the worker thread owns the bus.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use iogate::adapters::i2c::HalBus;
use iogate::app::events::GatekeeperEvent;
use iogate::app::ports::{Direction, EventSink};
use iogate::config::GatekeeperConfig;
use iogate::gatekeeper::{Gatekeeper, GatekeeperWorker, ShadowRegisters};

// ── Transaction record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Txn {
    pub address: u8,
    pub direction: Direction,
    pub byte: u8,
}

#[derive(Default)]
pub struct BusState {
    /// Output latch per device (power-on 0xFF).
    latches: HashMap<u8, u8>,
    /// Bits held low externally (pressed buttons).
    pulled_low: HashMap<u8, u8>,
    /// Addresses that never acknowledge.
    dead: HashSet<u8>,
    pub log: Vec<Txn>,
    busy: bool,
    pub overlaps: usize,
}

// ── MockExpanders ─────────────────────────────────────────────

#[derive(Clone)]
pub struct MockExpanders {
    state: Arc<Mutex<BusState>>,
}

#[allow(dead_code)]
impl MockExpanders {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BusState::default())),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap()
    }

    /// Make `address` stop acknowledging.
    pub fn kill(&self, address: u8) {
        self.state().dead.insert(address);
    }

    pub fn revive(&self, address: u8) {
        self.state().dead.remove(&address);
    }

    /// Hold `bit` of `address` low, as a pressed button would.
    pub fn press(&self, address: u8, bit: u8) {
        *self.state().pulled_low.entry(address).or_default() |= 1 << bit;
    }

    pub fn release(&self, address: u8, bit: u8) {
        *self.state().pulled_low.entry(address).or_default() &= !(1 << bit);
    }

    /// Latch byte last written to `address` (0xFF if never written).
    pub fn latch(&self, address: u8) -> u8 {
        self.state().latches.get(&address).copied().unwrap_or(0xFF)
    }

    pub fn log(&self) -> Vec<Txn> {
        self.state().log.clone()
    }

    /// Log without the startup probe writes.
    pub fn requests_log(&self, devices: usize) -> Vec<Txn> {
        self.log().into_iter().skip(devices).collect()
    }

    pub fn overlaps(&self) -> usize {
        self.state().overlaps
    }
}

impl Default for MockExpanders {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorType for MockExpanders {
    type Error = ErrorKind;
}

impl I2c for MockExpanders {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        {
            let mut s = self.state();
            if s.busy {
                s.overlaps += 1;
            }
            s.busy = true;
        }
        // Widen the window in which a second caller would be caught.
        thread::yield_now();

        let mut s = self.state();
        s.busy = false;
        if s.dead.contains(&address) {
            let direction = match operations.first() {
                Some(Operation::Read(_)) => Direction::Read,
                _ => Direction::Write,
            };
            s.log.push(Txn {
                address,
                direction,
                byte: 0,
            });
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    for &b in bytes.iter() {
                        s.latches.insert(address, b);
                        s.log.push(Txn {
                            address,
                            direction: Direction::Write,
                            byte: b,
                        });
                    }
                }
                Operation::Read(buf) => {
                    let latch = s.latches.get(&address).copied().unwrap_or(0xFF);
                    let low = s.pulled_low.get(&address).copied().unwrap_or(0);
                    let pins = latch & !low;
                    buf.fill(pins);
                    s.log.push(Txn {
                        address,
                        direction: Direction::Read,
                        byte: pins,
                    });
                }
            }
        }
        Ok(())
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<GatekeeperEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &GatekeeperEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

/// What the worker looked like after serving.
pub struct WorkerOutcome {
    pub shadow: ShadowRegisters,
    pub events: Vec<GatekeeperEvent>,
}

/// Run a worker on its own thread for exactly `requests` requests while
/// `clients` drives the gatekeeper from the calling thread.
pub fn run_gatekeeper<R>(
    config: &GatekeeperConfig,
    bus: &MockExpanders,
    requests: usize,
    clients: impl FnOnce(&Gatekeeper) -> R,
) -> (R, WorkerOutcome) {
    let gatekeeper = Gatekeeper::new(config).unwrap();
    let gk = &gatekeeper;
    let bus = bus.clone();

    thread::scope(|scope| {
        let worker = scope.spawn(move || {
            let mut worker =
                GatekeeperWorker::new(gk, HalBus::new(bus), RecordingSink::default());
            worker.start();
            for _ in 0..requests {
                worker.serve_next();
            }
            let shadow = worker.shadow().clone();
            let (_, sink) = worker.into_parts();
            WorkerOutcome {
                shadow,
                events: sink.events,
            }
        });

        let result = clients(gk);
        (result, worker.join().unwrap())
    })
}
