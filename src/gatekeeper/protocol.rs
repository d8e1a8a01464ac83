//! Request/reply protocol between clients and the worker.
//!
//! Requests flow many-to-one through the shared channel; replies flow
//! point-to-point into the requester's own mailbox.  The mailbox is an
//! `embassy-sync` [`Signal`]: one slot, a new value overwrites the old.

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use super::port::LogicalPort;
use crate::app::ports::Direction;
use crate::error::{Error, TransportError};

/// The bit-level operation a client asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Sample one bit.
    Read,
    /// Drive one bit high (`true`) or low (`false`).
    Write(bool),
}

impl Command {
    pub const fn direction(self) -> Direction {
        match self {
            Self::Read => Direction::Read,
            Self::Write(_) => Direction::Write,
        }
    }
}

/// Outcome of one request.  Delivery itself means "ready".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Bit read, or echo of the bit written.
    Ok(bool),
    /// The bus transaction failed; any value is meaningless.
    Err(TransportError),
}

impl Reply {
    pub fn into_result(self) -> Result<bool, Error> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(e) => Err(Error::Transport(e)),
        }
    }
}

/// A client's private reply slot.  Carries the sequence number of the
/// request the reply answers.
pub(crate) struct Mailbox {
    slot: Signal<CriticalSectionRawMutex, (u32, Reply)>,
}

impl Mailbox {
    pub(crate) fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    /// Wait for the next delivery and take it out of the slot.
    pub(crate) async fn wait(&self) -> (u32, Reply) {
        self.slot.wait().await
    }
}

/// Handle to exactly one client's mailbox.
#[derive(Clone)]
pub struct ReplyTarget(Arc<Mailbox>);

impl ReplyTarget {
    pub(crate) fn new(mailbox: &Arc<Mailbox>) -> Self {
        Self(Arc::clone(mailbox))
    }

    /// Deliver `reply` for request `seq`, overwriting anything undelivered.
    pub(crate) fn deliver(&self, seq: u32, reply: Reply) {
        self.0.slot.signal((seq, reply));
    }
}

impl core::fmt::Debug for ReplyTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ReplyTarget({:p})", Arc::as_ptr(&self.0))
    }
}

/// One bit-level operation in flight.
///
/// Owned by the channel until the worker dequeues it, then by the worker
/// until the reply is sent.  Never retained afterwards.
#[derive(Debug)]
pub struct Request {
    pub(crate) command: Command,
    pub(crate) port: LogicalPort,
    pub(crate) seq: u32,
    pub(crate) reply_to: ReplyTarget,
}
