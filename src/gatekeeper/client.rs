//! Client facade: blocking `get`/`put` for arbitrary caller tasks.
//!
//! Each call range-checks the port, waits for the worker's readiness
//! signal (first call only), pushes one request into the shared channel
//! and then waits on the client's own mailbox for the matching reply.
//! A client only borrows a readiness waiter slot while it is actually
//! parked, so the number of clients is unbounded.
//! The async `read`/`write` forms do the same for callers already running
//! on an executor.

use std::sync::Arc;

use futures_lite::future::{block_on, yield_now};
use log::debug;

use super::Gatekeeper;
use super::protocol::{Command, Mailbox, ReplyTarget, Request};
use crate::app::events::ProbeReport;
use crate::error::Result;

/// One requester.  Owns a single reply mailbox for its whole lifetime, so
/// at most one request per client is ever in flight (`&mut self`).
pub struct Client<'a> {
    gatekeeper: &'a Gatekeeper,
    report: Option<ProbeReport>,
    mailbox: Arc<Mailbox>,
    seq: u32,
}

impl<'a> Client<'a> {
    pub(crate) fn new(gatekeeper: &'a Gatekeeper) -> Self {
        Self {
            gatekeeper,
            report: None,
            mailbox: Arc::new(Mailbox::new()),
            seq: 0,
        }
    }

    // ── Blocking API ──────────────────────────────────────────

    /// Read the bit at `port`.  Blocks until the worker has answered.
    pub fn get(&mut self, port: u8) -> Result<bool> {
        block_on(self.read(port))
    }

    /// Drive the bit at `port` to `value`.  Returns the bit as written.
    pub fn put(&mut self, port: u8, value: bool) -> Result<bool> {
        block_on(self.write(port, value))
    }

    /// Startup probe outcome; blocks until the worker is ready.
    pub fn probe_report(&mut self) -> ProbeReport {
        block_on(self.wait_ready())
    }

    // ── Async API ─────────────────────────────────────────────

    pub async fn read(&mut self, port: u8) -> Result<bool> {
        self.round_trip(Command::Read, port).await
    }

    pub async fn write(&mut self, port: u8, value: bool) -> Result<bool> {
        self.round_trip(Command::Write(value), port).await
    }

    /// Wait for the readiness signal.  Only the first call can block.
    pub async fn wait_ready(&mut self) -> ProbeReport {
        if let Some(report) = self.report {
            return report;
        }
        let ready = &self.gatekeeper.ready;
        let report = loop {
            if let Some(report) = ready.anon_receiver().try_get() {
                break report;
            }
            match ready.receiver() {
                Some(mut waiter) => break waiter.get().await,
                // All waiter slots taken: try again on the next poll.
                None => yield_now().await,
            }
        };
        self.report = Some(report);
        report
    }

    // ── Internal ──────────────────────────────────────────────

    async fn round_trip(&mut self, command: Command, raw: u8) -> Result<bool> {
        // Contract violations never reach the channel.
        let port = self.gatekeeper.port(raw)?;

        self.wait_ready().await;

        self.seq = self.seq.wrapping_add(1);
        let seq = self.seq;
        let request = Request {
            command,
            port,
            seq,
            reply_to: ReplyTarget::new(&self.mailbox),
        };
        // Waits for space when the channel is full.
        self.gatekeeper.requests.send(request).await;

        loop {
            let (answered, reply) = self.mailbox.wait().await;
            if answered == seq {
                return reply.into_result();
            }
            // Left over from an async call that was dropped mid-flight.
            debug!("client: dropping stale reply #{} (waiting for #{})", answered, seq);
        }
    }
}
