//! Integration tests: startup probing and the readiness gate.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use iogate::adapters::i2c::HalBus;
use iogate::app::events::{GatekeeperEvent, ProbeReport};
use iogate::app::ports::Direction;
use iogate::config::GatekeeperConfig;
use iogate::error::{Error, TransportError};
use iogate::gatekeeper::{Gatekeeper, GatekeeperWorker, READY_WAITERS, WorkerState};

use crate::mock_bus::{MockExpanders, RecordingSink, Txn, run_gatekeeper};

#[test]
fn failed_probe_does_not_block_readiness() {
    let bus = MockExpanders::new();
    bus.kill(0x39);

    let ((report, dev1, dev0), outcome) =
        run_gatekeeper(&GatekeeperConfig::default(), &bus, 2, |gk| {
            let mut c = gk.client();
            let report = c.probe_report();
            (report, c.put(9, true), c.put(1, false))
        });

    assert_eq!(
        report,
        ProbeReport {
            devices: 2,
            present: 0b01
        }
    );
    assert_eq!(dev1, Err(Error::Transport(TransportError::NoAcknowledge)));
    assert_eq!(dev0, Ok(false));

    assert_eq!(
        outcome.events[..3],
        [
            GatekeeperEvent::DeviceProbed {
                index: 0,
                address: 0x38,
                error: None
            },
            GatekeeperEvent::DeviceProbed {
                index: 1,
                address: 0x39,
                error: Some(TransportError::NoAcknowledge)
            },
            GatekeeperEvent::Ready(report),
        ]
    );
}

#[test]
fn probe_writes_power_on_byte_to_every_device() {
    let bus = MockExpanders::new();
    run_gatekeeper(&GatekeeperConfig::default(), &bus, 0, |_| ());
    assert_eq!(
        bus.log(),
        [
            Txn {
                address: 0x38,
                direction: Direction::Write,
                byte: 0xFF
            },
            Txn {
                address: 0x39,
                direction: Direction::Write,
                byte: 0xFF
            },
        ]
    );
}

#[test]
fn clients_wait_for_probe_before_first_request() {
    let gatekeeper = Gatekeeper::new(&GatekeeperConfig::default()).unwrap();
    let bus = MockExpanders::new();
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        let gk = &gatekeeper;
        s.spawn(move || {
            let mut c = gk.client();
            tx.send(c.get(0)).unwrap();
        });

        // No worker yet: the client must be parked on readiness, not queued.
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(gk.pending(), 0);
        assert!(bus.log().is_empty());

        let mut worker = GatekeeperWorker::new(gk, HalBus::new(bus.clone()), RecordingSink::default());
        assert_eq!(worker.state(), WorkerState::Init);
        worker.serve_next();
        assert_eq!(worker.state(), WorkerState::Serving);

        assert_eq!(rx.recv().unwrap(), Ok(true));
    });

    let log = bus.log();
    assert_eq!(log.len(), 3);
    assert!(log[..2].iter().all(|t| t.direction == Direction::Write));
    assert_eq!(log[2].direction, Direction::Read);
}

#[test]
fn late_client_sees_readiness_immediately() {
    let bus = MockExpanders::new();
    let (report, _) = run_gatekeeper(&GatekeeperConfig::default(), &bus, 1, |gk| {
        let mut first = gk.client();
        first.get(0).unwrap();
        // Created after readiness was published.
        let mut late = gk.client();
        late.probe_report()
    });
    assert!(report.all_present());
}

#[test]
fn more_waiters_than_ready_slots_all_get_through() {
    const CLIENTS: usize = READY_WAITERS + 4;
    let gatekeeper = Gatekeeper::new(&GatekeeperConfig::default()).unwrap();
    let bus = MockExpanders::new();
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        let gk = &gatekeeper;
        for _ in 0..CLIENTS {
            let tx = tx.clone();
            s.spawn(move || {
                let mut c = gk.client();
                tx.send(c.get(0)).unwrap();
            });
        }

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(gk.pending(), 0);

        let mut worker = GatekeeperWorker::new(gk, HalBus::new(bus.clone()), RecordingSink::default());
        worker.start();
        for _ in 0..CLIENTS {
            worker.serve_next();
        }
    });
    drop(tx);

    let levels: Vec<_> = rx.iter().collect();
    assert_eq!(levels.len(), CLIENTS);
    assert!(levels.iter().all(|l| *l == Ok(true)));
}

#[test]
fn client_count_is_not_bounded_by_waiter_slots() {
    let bus = MockExpanders::new();
    let n = READY_WAITERS * 2;
    let (levels, _) = run_gatekeeper(&GatekeeperConfig::default(), &bus, n, |gk| {
        let mut clients: Vec<_> = (0..n).map(|_| gk.client()).collect();
        clients.iter_mut().map(|c| c.get(0)).collect::<Vec<_>>()
    });
    assert_eq!(levels.len(), n);
    assert!(levels.iter().all(|l| *l == Ok(true)));
}
