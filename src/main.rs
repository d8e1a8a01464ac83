//! IoGate Firmware: Main Entry Point
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  usrtask1 (mirror buttons → LEDs)   usrtask2 (blink LED3)    │
//! │        │ get/put                          │ get/put          │
//! │        ▼                                  ▼                  │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  Gatekeeper: request channel · readiness · mailboxes   │  │
//! │  └───────────────────────────┬────────────────────────────┘  │
//! │                              ▼                               │
//! │  GatekeeperWorker (sole bus owner, shadow registers)         │
//! │                              │                               │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                              ▼                               │
//! │  EspBus (I2C0 master)   LogEventSink (serial)                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info};

use iogate::adapters::esp_i2c::EspBus;
use iogate::adapters::log_sink::LogEventSink;
use iogate::app::tasks::{self, BUTTON_LEDS};
use iogate::config::GatekeeperConfig;
use iogate::drivers::task_pin::{self, TaskSpec};
use iogate::gatekeeper::{Gatekeeper, GatekeeperWorker};
use iogate::pins;

/// Blink period of the free-running LED.
const BLINK_PERIOD: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("IoGate v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config + shared gatekeeper state ───────────────────
    let config = GatekeeperConfig::default();
    let gatekeeper: &'static Gatekeeper = Box::leak(Box::new(
        Gatekeeper::new(&config).context("gatekeeper config")?,
    ));

    // ── 3. Bus owner ──────────────────────────────────────────
    let bus = EspBus::new(&config).context("I2C init failed")?;
    let worker = GatekeeperWorker::new(gatekeeper, bus, LogEventSink::new());
    task_pin::spawn(TaskSpec::GATEKEEPER, move || worker.run())?;

    // ── 4. Application tasks ──────────────────────────────────
    let mut mirror = gatekeeper.client();
    task_pin::spawn(TaskSpec::client("usrtask1\0"), move || {
        if let Err(e) = tasks::light_all(&mut mirror, &BUTTON_LEDS) {
            error!("usrtask1: initial LED write failed: {}", e);
        }
        loop {
            if let Err(e) = tasks::mirror_once(&mut mirror, &BUTTON_LEDS) {
                error!("usrtask1: {}", e);
            }
        }
    })?;

    let mut blinker = gatekeeper.client();
    task_pin::spawn(TaskSpec::client("usrtask2\0"), move || {
        loop {
            std::thread::sleep(BLINK_PERIOD);
            if let Err(e) = tasks::toggle(&mut blinker, pins::LED3_PORT) {
                error!("usrtask2: {}", e);
            }
        }
    })?;

    info!("All tasks started");
    loop {
        std::thread::park();
    }
}
