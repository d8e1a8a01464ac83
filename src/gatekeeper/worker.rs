//! The gatekeeper worker: sole owner of the bus and the shadow registers.
//!
//! ```text
//!   Init ──probe all devices──▶ publish readiness ──▶ Serving ⟲
//! ```
//!
//! In `Serving` the worker takes one request at a time off the channel,
//! performs exactly one bus transaction for it, and answers the requester
//! before looking at the next request.  That gives every client a totally
//! ordered, never-overlapping view of the bus.

use futures_lite::future::block_on;
use log::debug;

use super::Gatekeeper;
use super::port::LogicalPort;
use super::protocol::{Command, Reply, Request};
use super::shadow::ShadowRegisters;
use crate::app::events::{GatekeeperEvent, ProbeReport};
use crate::app::ports::{BusTransport, Direction, EventSink};
use crate::error::TransportError;

/// Lifecycle of the worker.  There is no way out of `Serving`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Init,
    Serving,
}

/// The only task allowed to call [`BusTransport::transact`].
pub struct GatekeeperWorker<'a, B: BusTransport, S: EventSink> {
    gatekeeper: &'a Gatekeeper,
    bus: B,
    sink: S,
    shadow: ShadowRegisters,
    state: WorkerState,
    report: Option<ProbeReport>,
}

impl<'a, B: BusTransport, S: EventSink> GatekeeperWorker<'a, B, S> {
    /// Take ownership of the bus.  Nothing touches the hardware until
    /// [`start`](Self::start) or [`run`](Self::run).
    pub fn new(gatekeeper: &'a Gatekeeper, bus: B, sink: S) -> Self {
        Self {
            gatekeeper,
            bus,
            sink,
            shadow: ShadowRegisters::new(gatekeeper.device_count()),
            state: WorkerState::Init,
            report: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Probe every device, then release waiting clients.
    ///
    /// A device that fails its probe is reported but does not hold up
    /// readiness; its later requests fail individually.  Calling this again
    /// once serving is a no-op.
    pub fn start(&mut self) -> ProbeReport {
        if let Some(report) = self.report {
            return report;
        }

        let mut present = 0u8;
        for index in 0..self.gatekeeper.device_count() {
            let Some(address) = self.gatekeeper.address(index) else {
                continue;
            };
            let probe = self.shadow.get(index).unwrap_or(ShadowRegisters::POWER_ON);
            let error = match self.bus.transact(address, Direction::Write, probe) {
                Ok(_) => {
                    debug!("GK: device 0x{:02X} present", address);
                    present |= 1 << index;
                    None
                }
                Err(e) => {
                    debug!("GK: device 0x{:02X} not responding ({})", address, e);
                    Some(e)
                }
            };
            self.sink.emit(&GatekeeperEvent::DeviceProbed {
                index,
                address,
                error,
            });
        }

        let report = ProbeReport {
            devices: self.gatekeeper.device_count() as u8,
            present,
        };
        self.gatekeeper.ready.sender().send(report);
        self.sink.emit(&GatekeeperEvent::Ready(report));
        debug!("GK: serving, {} queued", self.gatekeeper.pending());

        self.report = Some(report);
        self.state = WorkerState::Serving;
        report
    }

    /// Block for the next request, execute it, and reply.
    ///
    /// Runs [`start`](Self::start) first if probing has not happened yet.
    pub fn serve_next(&mut self) {
        if self.state == WorkerState::Init {
            self.start();
        }
        let request = block_on(self.gatekeeper.requests.receive());
        self.serve(request);
    }

    /// Probe, then serve requests forever.
    pub fn run(mut self) -> ! {
        self.start();
        loop {
            self.serve_next();
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// The shadow table as of the last completed request.
    pub fn shadow(&self) -> &ShadowRegisters {
        &self.shadow
    }

    /// Probe outcome, once [`start`](Self::start) has run.
    pub fn probe_report(&self) -> Option<ProbeReport> {
        self.report
    }

    /// Give back the bus and sink (host tests inspect them afterwards).
    pub fn into_parts(self) -> (B, S) {
        (self.bus, self.sink)
    }

    // ── Internal ──────────────────────────────────────────────

    fn serve(&mut self, request: Request) {
        let Request {
            command,
            port,
            seq,
            reply_to,
        } = request;

        let reply = self.execute(command, port);
        debug!("GK: #{} {:?} {} -> {:?}", seq, command, port, reply);
        reply_to.deliver(seq, reply);
    }

    /// Perform exactly one bus transaction for `command`.
    fn execute(&mut self, command: Command, port: LogicalPort) -> Reply {
        let device = port.device();
        let bit = port.bit();
        let Some(address) = self.gatekeeper.address(device) else {
            return Reply::Err(TransportError::UnknownDevice);
        };

        match command {
            Command::Read => match self.bus.transact(address, Direction::Read, 0) {
                Ok(byte) => Reply::Ok((byte >> bit) & 1 == 1),
                Err(e) => self.fail(address, command, e),
            },
            Command::Write(value) => {
                let Some(next) = self.shadow.compute_next(device, bit, value) else {
                    return Reply::Err(TransportError::UnknownDevice);
                };
                match self.bus.transact(address, Direction::Write, next) {
                    Ok(_) => {
                        self.shadow.commit(device, next);
                        Reply::Ok(value)
                    }
                    Err(e) => self.fail(address, command, e),
                }
            }
        }
    }

    /// The sink does the logging for failed transactions.
    fn fail(&mut self, address: u8, command: Command, error: TransportError) -> Reply {
        self.sink.emit(&GatekeeperEvent::TransactionFailed {
            address,
            direction: command.direction(),
            error,
        });
        Reply::Err(error)
    }
}
