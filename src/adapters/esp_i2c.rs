//! ESP-IDF I2C master adapter (legacy command-link driver).
//!
//! Builds each transaction as START, address+R/W, one data byte, STOP on a
//! command link and executes it with a bounded timeout.  The command link
//! is owned by a [`CmdLink`] guard, so it is freed on every exit path no
//! matter which step failed.
//!
//! On non-espidf targets this module compiles to nothing; host builds use
//! [`HalBus`](super::i2c::HalBus) over a simulated bus instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::app::ports::{BusTransport, Direction};
#[cfg(target_os = "espidf")]
use crate::config::GatekeeperConfig;
#[cfg(target_os = "espidf")]
use crate::error::TransportError;

/// I2C controller used for the expander bus.
#[cfg(target_os = "espidf")]
const I2C_PORT: i2c_port_t = 0; // I2C_NUM_0

/// Map an `esp_err_t` onto the transport taxonomy.
#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t) -> Result<(), TransportError> {
    if ret == ESP_OK as esp_err_t {
        Ok(())
    } else if ret == ESP_ERR_TIMEOUT as esp_err_t {
        Err(TransportError::Timeout)
    } else if ret == ESP_FAIL as esp_err_t {
        // Command completed but the slave NACKed.
        Err(TransportError::NoAcknowledge)
    } else if ret == ESP_ERR_INVALID_STATE as esp_err_t {
        Err(TransportError::Bus)
    } else {
        Err(TransportError::Other(ret))
    }
}

// ── Command link guard ────────────────────────────────────────

/// Owned `i2c_cmd_handle_t`; deleted on drop.
#[cfg(target_os = "espidf")]
struct CmdLink(i2c_cmd_handle_t);

#[cfg(target_os = "espidf")]
impl CmdLink {
    fn new() -> Result<Self, TransportError> {
        // SAFETY: allocates a fresh link; null means out of memory.
        let handle = unsafe { i2c_cmd_link_create() };
        if handle.is_null() {
            Err(TransportError::Other(ESP_ERR_NO_MEM as esp_err_t))
        } else {
            Ok(Self(handle))
        }
    }
}

#[cfg(target_os = "espidf")]
impl Drop for CmdLink {
    fn drop(&mut self) {
        // SAFETY: the handle came from i2c_cmd_link_create and is deleted once.
        unsafe { i2c_cmd_link_delete(self.0) };
    }
}

// ── Bus ───────────────────────────────────────────────────────

/// Expander bus on I2C controller 0.
#[cfg(target_os = "espidf")]
pub struct EspBus {
    timeout_ticks: TickType_t,
}

#[cfg(target_os = "espidf")]
impl EspBus {
    /// Configure the controller as master and install the driver.
    pub fn new(config: &GatekeeperConfig) -> Result<Self, TransportError> {
        let mut conf = i2c_config_t {
            mode: i2c_mode_t_I2C_MODE_MASTER,
            sda_io_num: config.i2c_sda_gpio,
            scl_io_num: config.i2c_scl_gpio,
            sda_pullup_en: true,
            scl_pullup_en: true,
            ..Default::default()
        };
        conf.__bindgen_anon_1.master.clk_speed = config.bus_clock_hz;

        // SAFETY: called once from main() before the worker thread starts.
        unsafe {
            check(i2c_param_config(I2C_PORT, &conf))?;
            check(i2c_driver_install(I2C_PORT, conf.mode, 0, 0, 0))?;
        }
        info!(
            "EspBus: I2C0 master on SDA={} SCL={} @ {} Hz",
            config.i2c_sda_gpio, config.i2c_scl_gpio, config.bus_clock_hz
        );

        Ok(Self {
            timeout_ticks: config.timeout_ticks(configTICK_RATE_HZ),
        })
    }

    fn execute(&mut self, address: u8, direction: Direction, data: u8) -> Result<u8, TransportError> {
        let link = CmdLink::new()?;
        let mut read_back = 0u8;
        let rw = match direction {
            Direction::Read => i2c_rw_t_I2C_MASTER_READ,
            Direction::Write => i2c_rw_t_I2C_MASTER_WRITE,
        };

        // SAFETY: `link` is live for the whole block and `read_back`
        // outlives i2c_master_cmd_begin, which is where it gets written.
        unsafe {
            check(i2c_master_start(link.0))?;
            check(i2c_master_write_byte(link.0, (address << 1) | rw as u8, true))?;
            match direction {
                Direction::Read => check(i2c_master_read_byte(
                    link.0,
                    &mut read_back,
                    i2c_ack_type_t_I2C_MASTER_NACK,
                ))?,
                Direction::Write => check(i2c_master_write_byte(link.0, data, true))?,
            }
            check(i2c_master_stop(link.0))?;
            check(i2c_master_cmd_begin(I2C_PORT, link.0, self.timeout_ticks))?;
        }

        Ok(match direction {
            Direction::Read => read_back,
            Direction::Write => data,
        })
    }
}

#[cfg(target_os = "espidf")]
impl BusTransport for EspBus {
    fn transact(
        &mut self,
        address: u8,
        direction: Direction,
        data: u8,
    ) -> Result<u8, TransportError> {
        self.execute(address, direction, data)
    }
}
