//! Core-pinned task spawning.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread` creates a FreeRTOS
//! task pinned to a given core with explicit priority and stack size.  On
//! non-ESP targets it falls back to a plain named thread.
//!
//! `esp_pthread_set_cfg()` applies to the *next* `pthread_create()` from
//! the calling thread, so the config→spawn pair must not be interleaved
//! with other thread creation on the same thread.

/// CPU core identifiers for the ESP32 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU): protocol stacks.
    Pro = 0,
    /// Core 1 (APP_CPU): application tasks.
    App = 1,
}

/// Placement and sizing of one task.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    /// Null-terminated name (e.g. `"gatekeeper\0"`).
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    /// The bus owner runs one priority level above its clients.
    pub const GATEKEEPER: Self = Self {
        name: "gatekeeper\0",
        core: Core::App,
        priority: 2,
        stack_kb: 4,
    };

    /// Application task talking to the gatekeeper.
    pub const fn client(name: &'static str) -> Self {
        Self {
            name,
            core: Core::App,
            priority: 1,
            stack_kb: 4,
        }
    }

    fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Spawn a thread pinned per `spec`.
#[cfg(target_os = "espidf")]
pub fn spawn(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    // SAFETY: the config struct is fully initialised from the IDF default
    // and `spec.name` is a 'static null-terminated string.
    unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = spec.core as i32;
        cfg.prio = spec.priority as i32;
        cfg.stack_size = (spec.stack_kb * 1024) as i32;
        cfg.thread_name = spec.name.as_ptr() as *const _;
        let ret = esp_idf_sys::esp_pthread_set_cfg(&cfg);
        if ret != esp_idf_sys::ESP_OK as i32 {
            return Err(std::io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
        }
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        spec.display_name(),
        spec.core,
        spec.priority,
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .spawn(f)
}

/// Simulation fallback: ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn(
    spec: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        spec.display_name(),
        spec.stack_kb
    );

    std::thread::Builder::new()
        .name(spec.display_name().into())
        .stack_size(spec.stack_kb * 1024)
        .spawn(f)
}
